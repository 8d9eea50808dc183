use crate::api::Mode;
use crate::args::ImportArgs;
use crate::commands::{connect, Out};
use crate::dashboard::{Dashboard, ImportMode, ImportReport};
use crate::error::{ErrorType, IntoResult};
use crate::{utils, Config, Result};
use std::path::Path;

/// Imports the CSV file named in `args`, row by row or as a single upload.
pub async fn import(config: Config, mode: Mode, args: ImportArgs) -> Result<Out<ImportReport>> {
    let import_mode = if args.upload() {
        ImportMode::Upload
    } else {
        ImportMode::Sequential
    };
    let mut dashboard = connect(&config, mode)?;
    let report = import_file(&mut dashboard, args.file(), import_mode).await?;
    Ok(Out::new(import_message(&report), report))
}

/// Reads `path` and hands it to `dashboard`.
pub(crate) async fn import_file(
    dashboard: &mut Dashboard,
    path: &Path,
    import_mode: ImportMode,
) -> Result<ImportReport> {
    let contents = utils::read_bytes(path).await.pub_result(ErrorType::Io)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "transactions.csv".to_string());
    dashboard
        .import(contents.as_slice(), &file_name, import_mode)
        .await
}

pub(crate) fn import_message(report: &ImportReport) -> String {
    match &report.response {
        Some(response) => format!("Uploaded the file, the server replied: {response}"),
        None => format!(
            "Imported {} transactions ({} failed, {} unreadable rows skipped)",
            report.submitted, report.failed, report.dropped
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    const CSV: &str = "description,amount,category,type,date\n\
                       Book,20,Entertainment,expense,2025-01-02\n\
                       Refund,5,Other,income,2025-01-03\n\
                       Broken,twenty,Food,expense,2025-01-04\n";

    #[tokio::test]
    async fn test_import_sequential() {
        let env = TestEnv::new().await;
        let path = env.path("bank.csv");
        std::fs::write(&path, CSV).unwrap();
        let out = import(env.config(), Mode::Test, ImportArgs::new(&path, false))
            .await
            .unwrap();
        let report = out.structure().unwrap();
        assert_eq!(report.submitted, 2);
        assert_eq!(report.dropped, 1);
        assert_eq!(
            out.message(),
            "Imported 2 transactions (0 failed, 1 unreadable rows skipped)"
        );
    }

    #[tokio::test]
    async fn test_import_upload() {
        let env = TestEnv::new().await;
        let path = env.path("bank.csv");
        std::fs::write(&path, CSV).unwrap();
        let out = import(env.config(), Mode::Test, ImportArgs::new(&path, true))
            .await
            .unwrap();
        assert!(out.message().contains("\"imported\":2"));
    }

    #[tokio::test]
    async fn test_import_missing_file() {
        let env = TestEnv::new().await;
        let err = import(
            env.config(),
            Mode::Test,
            ImportArgs::new(env.path("missing.csv"), false),
        )
        .await
        .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Io);
    }
}
