mod common;

use common::{new_user, seeded_services};
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn create_user_logs_inside_its_span() {
    let (_, users) = seeded_services();

    users
        .create(new_user("Ana", "Costa", "ana@x.com", "1"))
        .await
        .unwrap();

    assert!(logs_contain("user_admin.service.create_user"));
    assert!(logs_contain("Successfully created user with id=4"));
}

#[tokio::test]
#[traced_test]
async fn skipped_enrichment_is_logged_not_raised() {
    let (profiles, users) = seeded_services();
    profiles.remove("1").await.unwrap();

    let user = users.find_one("1").await.unwrap();

    assert!(user.profile.is_none());
    assert!(logs_contain("Profile enrichment skipped"));
}

#[tokio::test]
#[traced_test]
async fn module_init_logs_seed_configuration() {
    let _module = common::init_module().await;

    assert!(logs_contain("Initializing user_admin module"));
    assert!(logs_contain("seed_profiles=true"));
}
