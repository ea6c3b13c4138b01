use crate::app::{self, RecordingEmailClient, ACCOUNT_IDENTITY};
use serde_json::{json, Value};
use waitlist::configuration::Settings;

fn valid_body() -> Value {
    json!({
        "firstName": "Jean",
        "lastName": "Dupont",
        "email": "jean@x.com",
        "phone": "0600000000",
        "userType": "client",
        "city": "Paris"
    })
}

fn without(field: &str) -> Value {
    let mut body = valid_body();
    body.as_object_mut().unwrap().remove(field);
    body
}

#[actix_web::test]
async fn waitlist_returns_a_200_and_a_confirmation_for_valid_data() {
    let app = app::spawn_app().await;

    let response = app
        .post_waitlist(&valid_body())
        .await
        .expect("Failed to execute request");

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Email envoyé avec succès!" }));
}

#[actix_web::test]
async fn waitlist_sends_exactly_one_email_with_every_field() {
    let app = app::spawn_app().await;
    let mut body = valid_body();
    body["companyName"] = json!("Chez Jean");
    body["referralCode"] = json!("KLY-42");

    app.post_waitlist(&body)
        .await
        .expect("Failed to execute request");

    let attempts = app.email_client.attempts();
    assert_eq!(attempts.len(), 1);
    let email = &attempts[0];
    assert_eq!(email.subject, "Nouvelle inscription KLYPOP - Jean Dupont");
    assert_eq!(email.sender_name, "KLYPOP Waitlist");
    assert_eq!(email.sender_address, ACCOUNT_IDENTITY);
    for value in [
        "Jean",
        "Dupont",
        "jean@x.com",
        "0600000000",
        "Client",
        "Paris",
        "Chez Jean",
        "KLY-42",
    ] {
        assert!(email.text_body.contains(value), "{} missing from text body", value);
        assert!(email.html_body.contains(value), "{} missing from html body", value);
    }
}

#[actix_web::test]
async fn waitlist_delivers_to_the_account_identity_when_no_recipient_is_set() {
    let app = app::spawn_app().await;

    app.post_waitlist(&valid_body())
        .await
        .expect("Failed to execute request");

    assert_eq!(app.email_client.attempts()[0].recipient, ACCOUNT_IDENTITY);
}

#[actix_web::test]
async fn waitlist_delivers_to_the_configured_recipient() {
    let app = app::spawn_app_with(
        |c| c.email_client.recipient = Some("team@klypop.test".into()),
        RecordingEmailClient::default(),
    )
    .await;

    app.post_waitlist(&valid_body())
        .await
        .expect("Failed to execute request");

    assert_eq!(app.email_client.attempts()[0].recipient, "team@klypop.test");
}

#[actix_web::test]
async fn waitlist_returns_a_400_when_a_required_field_is_missing() {
    let app = app::spawn_app().await;
    let test_cases = vec![
        (without("firstName"), "missing the first name"),
        (without("lastName"), "missing the last name"),
        (without("email"), "missing the email"),
        (without("phone"), "missing the phone"),
        (without("userType"), "missing the user type"),
        (without("city"), "missing the city"),
        (json!({}), "missing everything"),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = app
            .post_waitlist(&invalid_body)
            .await
            .expect("Failed to execute request");

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with a 400 Bad Request when the payload was {}.",
            error_message
        );
        let body: Value = response.json().await.unwrap();
        assert_eq!(
            body,
            json!({ "error": "Tous les champs requis doivent être remplis." })
        );
    }

    assert!(app.email_client.attempts().is_empty());
}

#[actix_web::test]
async fn waitlist_returns_a_400_when_fields_are_blank_or_unknown() {
    let app = app::spawn_app().await;
    let mut blank_city = valid_body();
    blank_city["city"] = json!("   ");
    let mut empty_phone = valid_body();
    empty_phone["phone"] = json!("");
    let mut unknown_user_type = valid_body();
    unknown_user_type["userType"] = json!("investor");
    let test_cases = vec![
        (blank_city, "a blank city"),
        (empty_phone, "an empty phone"),
        (unknown_user_type, "an unknown user type"),
    ];

    for (body, description) in test_cases {
        let response = app
            .post_waitlist(&body)
            .await
            .expect("Failed to execute request");

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with a 400 Bad Request when the payload had {}.",
            description
        );
    }

    assert!(app.email_client.attempts().is_empty());
}

#[actix_web::test]
async fn waitlist_returns_a_400_for_a_malformed_body() {
    let app = app::spawn_app().await;

    let response = app
        .post_waitlist_raw(r#"{"firstName": "Jean","#)
        .await
        .expect("Failed to execute request");

    assert_eq!(400, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Tous les champs requis doivent être remplis.");
}

#[actix_web::test]
async fn waitlist_returns_a_500_without_delivery_when_credentials_are_missing() {
    let test_cases: Vec<(fn(&mut Settings), &str)> = vec![
        (|c: &mut Settings| c.email_client.username = None, "EMAIL_USER"),
        (|c: &mut Settings| c.email_client.password = None, "EMAIL_PASSWORD"),
    ];

    for (strip, missing_key) in test_cases {
        let app = app::spawn_app_with(strip, RecordingEmailClient::default()).await;

        let response = app
            .post_waitlist(&valid_body())
            .await
            .expect("Failed to execute request");

        assert_eq!(500, response.status().as_u16());
        let body: Value = response.json().await.unwrap();
        let error = body["error"].as_str().unwrap();
        assert!(error.starts_with("Configuration email manquante"));
        assert!(error.contains(missing_key));
        assert!(app.email_client.attempts().is_empty());
    }
}

#[actix_web::test]
async fn waitlist_validates_before_checking_credentials() {
    let app = app::spawn_app_with(
        |c| c.email_client.username = None,
        RecordingEmailClient::default(),
    )
    .await;

    let response = app
        .post_waitlist(&without("city"))
        .await
        .expect("Failed to execute request");

    assert_eq!(400, response.status().as_u16());
}

#[actix_web::test]
async fn waitlist_hides_delivery_errors_behind_a_generic_500() {
    let app = app::spawn_app_with(|_| {}, RecordingEmailClient::failing()).await;

    let response = app
        .post_waitlist(&valid_body())
        .await
        .expect("Failed to execute request");

    assert_eq!(500, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "error": "Erreur lors de l'envoi de l'email. Veuillez réessayer plus tard." })
    );
    assert_eq!(app.email_client.attempts().len(), 1);
}

#[actix_web::test]
async fn identical_submissions_are_delivered_independently() {
    let app = app::spawn_app().await;

    for _ in 0..2 {
        let response = app
            .post_waitlist(&valid_body())
            .await
            .expect("Failed to execute request");
        assert_eq!(200, response.status().as_u16());
    }

    assert_eq!(app.email_client.attempts().len(), 2);
}
