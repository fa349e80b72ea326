use serde_json::json;

use codersnack_core::config::{ReminderConfig, DEFAULT_CATEGORY};
use codersnack_core::contract::{MailMessage, MockContentApi, MockMailer};
use codersnack_core::error::{FetchError, MailError};
use codersnack_core::reminder::{handle_raw_reminder, handle_reminder, ReminderRequest};

const ENDPOINT: &str = "https://api.example.com/.netlify/functions/codersnack-random";
const API_KEY: &str = "SG.super-secret-key";

fn config() -> ReminderConfig {
    ReminderConfig {
        endpoint: ENDPOINT.to_string(),
        default_category: DEFAULT_CATEGORY.to_string(),
        to: "reader@example.com".to_string(),
        from: "admin@example.com".to_string(),
        template_id: "d-template".to_string(),
        sender_name: "Reminder".to_string(),
    }
}

fn random_snack(key: &str) -> serde_json::Value {
    json!({
        "id": 42,
        "codersnack": {
            "id": 420,
            "header": "useEffect cleanup",
            "created_at": "2021-01-01",
            "explanation": "Return a function.",
            "featured_image_url": null,
            "weblink": "https://codersnack.dev/use-effect"
        },
        "codersnacks_category": {
            "id": 5,
            "header": "React JS",
            "key": key,
            "description": null,
            "image_url": "http://img/react.png"
        }
    })
}

fn api_serving(expected_url: String, key: &'static str) -> MockContentApi {
    let mut api = MockContentApi::new();
    api.expect_get_json()
        .withf(move |url: &str| url == expected_url)
        .times(1)
        .returning(move |_| Ok(random_snack(key)));
    api
}

#[tokio::test]
async fn category_from_query_is_fetched_and_sent_once() {
    let api = api_serving(format!("{ENDPOINT}?category=vuejs&entity=snack"), "vuejs");

    let mut mailer = MockMailer::new();
    mailer
        .expect_send()
        .withf(|msg: &MailMessage| msg.dynamic_template_data["category-key"] == "vuejs")
        .times(1)
        .returning(|_| Ok(()));

    let response = handle_reminder(
        &api,
        &mailer,
        &config(),
        &ReminderRequest::for_category("vuejs"),
    )
    .await;

    assert_eq!(response.status_code, 200);
    assert!(response.is_success());
    assert_eq!(response.body["message"], "Email has been sent");
    assert_eq!(response.body["templateId"], "d-template");
    assert_eq!(
        response.body["dynamicTemplateData"]["subject"],
        "useEffect cleanup [Codersnack Daily Reminder]"
    );
    assert_eq!(response.body["dynamicTemplateData"]["snack-id"], "420");
    assert_eq!(
        response.body["dynamicTemplateData"]["url"],
        "https://codersnack.dev/use-effect"
    );
}

#[tokio::test]
async fn missing_category_defaults_to_reactjs() {
    let api = api_serving(format!("{ENDPOINT}?category=reactjs&entity=snack"), "reactjs");

    let mut mailer = MockMailer::new();
    mailer
        .expect_send()
        .withf(|msg: &MailMessage| msg.dynamic_template_data["category-key"] == "reactjs")
        .times(1)
        .returning(|_| Ok(()));

    let response = handle_reminder(&api, &mailer, &config(), &ReminderRequest::default()).await;
    assert_eq!(response.status_code, 200);
}

#[tokio::test]
async fn send_failure_yields_500_with_error_text_and_no_key() {
    let api = api_serving(format!("{ENDPOINT}?category=reactjs&entity=snack"), "reactjs");

    let mut mailer = MockMailer::new();
    mailer.expect_send().times(1).returning(|_| {
        Err(MailError::Rejected {
            status: 401,
            body: "The provided authorization grant is invalid".to_string(),
        })
    });

    let response = handle_reminder(&api, &mailer, &config(), &ReminderRequest::default()).await;

    assert_eq!(response.status_code, 500);
    assert!(!response.is_success());
    let error = response.body["error"].as_str().expect("error text");
    assert!(error.starts_with("Error sending email "));
    assert!(error.contains("authorization grant is invalid"));
    assert!(!response.body.to_string().contains(API_KEY));
}

#[tokio::test]
async fn fetch_failure_skips_send() {
    let mut api = MockContentApi::new();
    api.expect_get_json().times(1).returning(|url: &str| {
        Err(FetchError::Transport {
            url: url.to_owned(),
            message: "connection refused".to_string(),
        })
    });
    let mut mailer = MockMailer::new();
    mailer.expect_send().times(0);

    let response = handle_reminder(&api, &mailer, &config(), &ReminderRequest::default()).await;
    assert_eq!(response.status_code, 500);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .contains("connection refused"));
}

#[tokio::test]
async fn invalid_category_is_rejected_without_fetching() {
    let mut api = MockContentApi::new();
    api.expect_get_json().times(0);
    let mut mailer = MockMailer::new();
    mailer.expect_send().times(0);

    let response = handle_reminder(
        &api,
        &mailer,
        &config(),
        &ReminderRequest::for_category("css&entity=quiz"),
    )
    .await;
    assert_eq!(response.status_code, 500);
}

#[tokio::test]
async fn raw_reminder_sends_literal_subject_and_snack_json() {
    let api = api_serving(format!("{ENDPOINT}?category=reactjs&entity=snack"), "reactjs");

    let mut mailer = MockMailer::new();
    mailer
        .expect_send()
        .withf(|msg: &MailMessage| {
            let text: serde_json::Value =
                serde_json::from_str(msg.text.as_deref().unwrap_or_default()).unwrap_or_default();
            msg.template_id.is_none()
                && msg.subject.as_deref() == Some("Snack of the day")
                && msg.dynamic_template_data.is_empty()
                && text["snack"]["header"] == "useEffect cleanup"
                && text["category"]["key"] == "reactjs"
        })
        .times(1)
        .returning(|_| Ok(()));

    let response = handle_raw_reminder(
        &api,
        &mailer,
        &config(),
        &ReminderRequest::default(),
        "Snack of the day",
    )
    .await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, json!({ "message": "Email has been sent" }));
}

#[tokio::test]
async fn raw_reminder_send_failure_is_reported() {
    let api = api_serving(format!("{ENDPOINT}?category=css&entity=snack"), "css");

    let mut mailer = MockMailer::new();
    mailer.expect_send().times(1).returning(|_| {
        Err(MailError::Transport("connection reset".to_string()))
    });

    let response = handle_raw_reminder(
        &api,
        &mailer,
        &config(),
        &ReminderRequest::for_category("css"),
        "Snack of the day",
    )
    .await;

    assert_eq!(response.status_code, 500);
    let error = response.body["error"].as_str().expect("error text");
    assert!(error.starts_with("Error sending email "));
    assert!(error.contains("connection reset"));
    assert!(!error.contains(API_KEY));
}
