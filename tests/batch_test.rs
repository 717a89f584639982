mod common;

use apply_autofill::config::ReviewMode;
use apply_autofill::infrastructure::PageSnapshot;
use apply_autofill::models::JobStatus;
use apply_autofill::orchestrator::{BatchGate, BatchRequest, BatchRunner};
use apply_autofill::services::OutcomeRecorder;
use apply_autofill::AppError;
use common::{fast_config, profile, FakeElement, FakePage};

fn apply_form() -> Vec<FakeElement> {
    vec![
        FakeElement::text("email").label("Email"),
        FakeElement::button("apply", "Apply"),
    ]
}

#[tokio::test]
async fn test_scenario_email_filled_and_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(&dir.path().join("log.csv"));
    let page = FakePage::new(apply_form());
    let runner = BatchRunner::new(page, profile(), config);

    let summary = runner
        .run(&BatchRequest::new(vec!["https://boards.greenhouse.io/acme/jobs/1".into()]))
        .await
        .unwrap();

    assert_eq!(runner.page().value("email"), "a@b.com");
    assert_eq!(summary.total, 1);
    assert_eq!(summary.failed, 0);

    let rows = runner.recorder().read_all().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_ne!(rows[0][3], JobStatus::Error.as_str());
    assert_eq!(rows[0][6], "Greenhouse");
}

#[tokio::test]
async fn test_scenario_unreachable_url_is_one_error_row() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(&dir.path().join("log.csv"));
    let bad = "https://does-not-exist.invalid/job";
    let good = "https://jobs.lever.co/acme/2";
    let page = FakePage::new(apply_form()).failing_on(bad);
    let runner = BatchRunner::new(page, profile(), config);

    let summary = runner
        .run(&BatchRequest::new(vec![bad.into(), good.into()]))
        .await
        .unwrap();

    // 失败的 URL 不影响后面的 URL
    assert_eq!(runner.page().navigations(), vec![bad.to_string(), good.to_string()]);
    assert_eq!(summary.failed, 1);

    let rows = runner.recorder().read_all().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][3], "error");
    assert_eq!(rows[0][7], bad);
    assert!(!rows[0][9].is_empty());
    assert!(rows[0][9].contains("ERR_NAME_NOT_RESOLVED"));
    assert_ne!(rows[1][3], "error");
}

#[tokio::test]
async fn test_scenario_auto_submit_clicks_apply() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fast_config(&dir.path().join("log.csv"));
    config.review_mode = ReviewMode::AutoSubmit;
    config.auto_submit = true;
    let runner = BatchRunner::new(FakePage::new(apply_form()), profile(), config);

    let summary = runner
        .run(&BatchRequest::new(vec!["https://acme.example/jobs/3".into()]))
        .await
        .unwrap();

    assert_eq!(runner.page().element("apply").clicks, 1);
    assert_eq!(summary.clicked, 1);
    let rows = runner.recorder().read_all().await.unwrap();
    assert_eq!(rows[0][3], "clicked");
}

#[tokio::test]
async fn test_scenario_auto_submit_off_skips() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fast_config(&dir.path().join("log.csv"));
    config.review_mode = ReviewMode::AutoSubmit;
    config.auto_submit = false;
    let runner = BatchRunner::new(FakePage::new(apply_form()), profile(), config);

    runner
        .run(&BatchRequest::new(vec!["https://acme.example/jobs/4".into()]))
        .await
        .unwrap();

    assert_eq!(runner.page().element("apply").clicks, 0);
    let rows = runner.recorder().read_all().await.unwrap();
    assert_eq!(rows[0][3], "skipped");
    assert!(rows[0][9].contains("auto-submit off"));
}

#[tokio::test]
async fn test_request_flag_overrides_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fast_config(&dir.path().join("log.csv"));
    config.review_mode = ReviewMode::AutoSubmit;
    let runner = BatchRunner::new(FakePage::new(apply_form()), profile(), config);

    let request = BatchRequest {
        urls: vec!["https://acme.example/jobs/5".into()],
        auto_submit: Some(true),
    };
    runner.run(&request).await.unwrap();

    assert_eq!(runner.page().element("apply").clicks, 1);
}

#[tokio::test]
async fn test_no_submit_control_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fast_config(&dir.path().join("log.csv"));
    config.review_mode = ReviewMode::AutoSubmit;
    config.auto_submit = true;
    let page = FakePage::new(vec![FakeElement::text("email").label("Email")]);
    let runner = BatchRunner::new(page, profile(), config);

    runner
        .run(&BatchRequest::new(vec!["https://acme.example/jobs/6".into()]))
        .await
        .unwrap();

    let rows = runner.recorder().read_all().await.unwrap();
    assert_eq!(rows[0][3], "skipped");
    assert!(rows[0][9].contains("no submit control"));
}

#[tokio::test]
async fn test_manual_review_waits_for_close() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(&dir.path().join("log.csv"));
    let runner = BatchRunner::new(FakePage::new(apply_form()), profile(), config);

    let summary = runner
        .run(&BatchRequest::new(vec![
            "https://acme.example/jobs/7".into(),
            "https://acme.example/jobs/8".into(),
        ]))
        .await
        .unwrap();

    assert_eq!(summary.submitted, 2);
    assert_eq!(runner.page().closes(), 2);
    assert_eq!(runner.page().notices().len(), 2);
    // 人工模式下不会自动点击
    assert_eq!(runner.page().element("apply").clicks, 0);
}

#[tokio::test]
async fn test_metadata_lands_in_record() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(&dir.path().join("log.csv"));
    let page = FakePage::new(apply_form()).with_snapshot(PageSnapshot {
        og_title: Some("Backend Engineer".into()),
        og_site_name: Some("Acme".into()),
        ..PageSnapshot::default()
    });
    let runner = BatchRunner::new(page, profile(), config);

    runner
        .run(&BatchRequest::new(vec!["https://jobs.smartrecruiters.com/acme/9".into()]))
        .await
        .unwrap();

    let rows = runner.recorder().read_all().await.unwrap();
    assert_eq!(rows[0][4], "Acme");
    assert_eq!(rows[0][5], "Backend Engineer");
    assert_eq!(rows[0][6], "SmartRecruiters");
    assert_eq!(rows[0][8], "/tmp/ada-cv.pdf");
    assert_eq!(rows[0][10].len(), 10);
}

#[tokio::test]
async fn test_invalid_batch_is_rejected_before_any_navigation() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(&dir.path().join("log.csv"));
    let runner = BatchRunner::new(FakePage::new(apply_form()), profile(), config);

    let empty = runner.run(&BatchRequest::new(Vec::new())).await;
    assert!(matches!(empty, Err(AppError::Config(_))));

    let relative = runner.run(&BatchRequest::new(vec!["/jobs/1".into()])).await;
    assert!(matches!(relative, Err(AppError::Config(_))));

    assert!(runner.page().navigations().is_empty());
    assert!(runner.recorder().read_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_log_write_failure_aborts_batch() {
    let dir = tempfile::tempdir().unwrap();
    // 目录不能当作文件打开
    let config = fast_config(dir.path());
    let runner = BatchRunner::new(FakePage::new(apply_form()), profile(), config);

    let result = runner
        .run(&BatchRequest::new(vec![
            "https://acme.example/jobs/10".into(),
            "https://acme.example/jobs/11".into(),
        ]))
        .await;

    assert!(matches!(result, Err(AppError::Record(_))));
    assert!(runner.page().navigations().len() <= 1);
}

#[tokio::test]
async fn test_existing_log_keeps_single_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.csv");

    for url in ["https://acme.example/jobs/12", "https://acme.example/jobs/13"] {
        let runner = BatchRunner::new(FakePage::new(apply_form()), profile(), fast_config(&path));
        runner.run(&BatchRequest::new(vec![url.into()])).await.unwrap();
    }

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.matches("version,timestamp_start").count(), 1);
    assert_eq!(OutcomeRecorder::new(&path).read_all().await.unwrap().len(), 2);
}

#[test]
fn test_gate_rejects_concurrent_batch() {
    let gate = BatchGate::new();
    let _guard = gate.try_begin().unwrap();
    assert!(gate.try_begin().is_err());
}
