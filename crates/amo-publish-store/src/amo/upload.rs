//! Upload a package and wait for the AMO validator
//!
//! The status check always follows a full interval wait, so the first
//! check happens one interval after the upload was created. The deadline
//! is measured from the start of polling.

use std::path::Path;

use tokio::time::{sleep, Instant};
use tracing::{debug, info, instrument};

use crate::error::{PublishError, Result};
use crate::traits::AddonsApi;
use crate::types::{Channel, PollSettings};

use super::auth::Credential;

/// Upload `package` and return its uuid once the validator accepted it
#[instrument(skip(api, credential, settings), fields(package = %package.display()))]
pub async fn submit_and_validate<A: AddonsApi + ?Sized>(
    api: &A,
    package: &Path,
    credential: &Credential,
    self_hosted: bool,
    settings: &PollSettings,
) -> Result<String> {
    let channel = Channel::from_self_hosted(self_hosted);
    let upload = api.create_upload(package, channel, credential).await?;

    wait_until_validated(api, &upload.uuid, credential, settings).await?;

    info!("xpi processed.");
    Ok(upload.uuid)
}

/// Poll the upload detail until it is processed or the deadline passes
pub async fn wait_until_validated<A: AddonsApi + ?Sized>(
    api: &A,
    uuid: &str,
    credential: &Credential,
    settings: &PollSettings,
) -> Result<()> {
    let start = Instant::now();
    let deadline = start + settings.timeout;

    while Instant::now() < deadline {
        info!(
            "xpi not yet validated. Wait {} seconds.",
            settings.interval.as_secs()
        );
        sleep(settings.interval).await;

        info!("Checking if xpi is validated.");
        let upload = api.get_upload(uuid, credential).await?;

        if upload.processed {
            if upload.valid {
                return Ok(());
            }

            debug!(validation = %upload.validation, "validation results");
            return Err(PublishError::ValidationFailed {
                detail: upload.validation,
            });
        }
    }

    Err(PublishError::ValidationTimeout {
        waited: start.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amo::auth::issue_credential;
    use crate::amo::testing::FakeApi;
    use crate::types::UploadResponse;
    use std::time::Duration;

    fn credential() -> Credential {
        issue_credential("test-jwt-issuer", "test-jwt-secret").unwrap()
    }

    fn status(processed: bool, valid: bool, validation: serde_json::Value) -> UploadResponse {
        UploadResponse {
            uuid: "test-upload-uuid".to_string(),
            channel: Some(Channel::Unlisted),
            processed,
            submitted: false,
            url: None,
            valid,
            validation,
            version: Some("1.0".to_string()),
        }
    }

    fn pending() -> UploadResponse {
        status(false, false, serde_json::json!({}))
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolves_after_pending_checks() {
        let api = FakeApi::new();
        for _ in 0..3 {
            api.push_status(pending());
        }
        api.push_status(status(true, true, serde_json::json!({})));

        let start = Instant::now();
        let uuid = submit_and_validate(
            &api,
            Path::new("addon.xpi"),
            &credential(),
            true,
            &PollSettings::default(),
        )
        .await
        .unwrap();

        assert_eq!(uuid, "test-upload-uuid");
        assert_eq!(api.uploads(), vec![Channel::Unlisted]);

        let checks = api.status_checks();
        assert_eq!(checks.len(), 4);
        for (i, at) in checks.iter().enumerate() {
            let expected = Duration::from_secs(5 * (i as u64 + 1));
            assert_eq!(at.duration_since(start), expected);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_check_waits_one_interval() {
        let api = FakeApi::new();
        api.push_status(status(true, true, serde_json::json!({})));

        let start = Instant::now();
        submit_and_validate(
            &api,
            Path::new("addon.xpi"),
            &credential(),
            false,
            &PollSettings::default(),
        )
        .await
        .unwrap();

        assert_eq!(api.uploads(), vec![Channel::Listed]);
        let checks = api.status_checks();
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].duration_since(start), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_when_never_processed() {
        let api = FakeApi::new();
        api.set_default_status(pending());

        let err = submit_and_validate(
            &api,
            Path::new("addon.xpi"),
            &credential(),
            true,
            &PollSettings::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, PublishError::ValidationTimeout { .. }));
        assert_eq!(err.exit_code(), 4);

        // 600s ceiling / 5s cadence
        let checks = api.status_checks();
        assert_eq!(checks.len(), 120);

        // Nothing else is requested after giving up
        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(api.status_checks().len(), 120);
    }

    #[tokio::test(start_paused = true)]
    async fn test_processed_but_invalid() {
        let api = FakeApi::new();
        api.push_status(pending());
        api.push_status(status(
            true,
            false,
            serde_json::json!({"errors": 1, "messages": [{"message": "Bad manifest"}]}),
        ));

        let err = submit_and_validate(
            &api,
            Path::new("addon.xpi"),
            &credential(),
            true,
            &PollSettings::default(),
        )
        .await
        .unwrap_err();

        match &err {
            PublishError::ValidationFailed { detail } => {
                assert_eq!(detail["errors"], 1);
                assert_eq!(detail["messages"][0]["message"], "Bad manifest");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.exit_code(), 2);
        assert_eq!(api.status_checks().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_poll_settings() {
        let api = FakeApi::new();
        api.set_default_status(pending());

        let settings = PollSettings {
            interval: Duration::from_secs(2),
            timeout: Duration::from_secs(10),
        };
        let err = wait_until_validated(&api, "test-upload-uuid", &credential(), &settings)
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::ValidationTimeout { .. }));
        assert_eq!(api.status_checks().len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_upload_failure_skips_polling() {
        let api = FakeApi::new();
        api.fail_upload_with(500);

        let err = submit_and_validate(
            &api,
            Path::new("addon.xpi"),
            &credential(),
            true,
            &PollSettings::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, PublishError::HttpStatus { status: 500, .. }));
        assert!(api.status_checks().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_error_aborts_polling() {
        let api = FakeApi::new();
        api.push_status(pending());
        api.fail_status_with(503);

        let err = wait_until_validated(
            &api,
            "test-upload-uuid",
            &credential(),
            &PollSettings::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, PublishError::HttpStatus { status: 503, .. }));
        assert_eq!(api.status_checks().len(), 2);
    }
}
