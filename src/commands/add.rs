use crate::api::Mode;
use crate::args::AddArgs;
use crate::commands::{connect, Out};
use crate::form::TransactionForm;
use crate::model::Transaction;
use crate::{Config, Result};

/// Validates the transaction described by `args` and creates it.
pub async fn add(config: Config, mode: Mode, args: AddArgs) -> Result<Out<Transaction>> {
    let form = TransactionForm {
        description: args.description().to_string(),
        amount: args.amount().to_string(),
        category: args.category().to_string(),
        kind: args.kind(),
        date: args.date().map(String::from),
    };
    let mut dashboard = connect(&config, mode)?;
    let created = dashboard.add(&form).await?;
    Ok(Out::new(
        format!(
            "Added {} {} '{}' with id {}",
            created.kind(),
            created.amount().money(),
            created.description(),
            created.id()
        ),
        created,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Kind;
    use crate::test::TestEnv;
    use crate::ErrorType;

    #[tokio::test]
    async fn test_add() {
        let env = TestEnv::new().await;
        let args = AddArgs::new("Dinner", "42.10", "Food", Kind::Expense, None);
        let out = add(env.config(), Mode::Test, args).await.unwrap();
        let created = out.structure().unwrap();
        assert_eq!(created.description(), "Dinner");
        assert_eq!(created.kind(), Kind::Expense);
        assert!(out.message().contains("$42.10"));
    }

    #[tokio::test]
    async fn test_add_negative_amount() {
        let env = TestEnv::new().await;
        let args = AddArgs::new("Dinner", "-42", "Food", Kind::Expense, None);
        let err = add(env.config(), Mode::Test, args).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
    }
}
