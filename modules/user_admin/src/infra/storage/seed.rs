use chrono::{DateTime, TimeZone, Utc};

use crate::contract::model::{Profile, User};

fn profile(id: &str, name: &str) -> Profile {
    Profile {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn day(month_day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, month_day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

fn user(
    id: &str,
    names: (&str, &str),
    email: &str,
    is_active: bool,
    profile_id: &str,
    created: DateTime<Utc>,
) -> User {
    User {
        id: id.to_string(),
        first_name: names.0.to_string(),
        last_name: names.1.to_string(),
        email: email.to_string(),
        is_active,
        profile_id: profile_id.to_string(),
        profile: None,
        created_at: created,
        updated_at: created,
        deleted_at: None,
    }
}

/// Built-in profiles loaded at startup.
pub fn profiles() -> Vec<Profile> {
    vec![
        profile("1", "Administrador"),
        profile("2", "Usuário"),
        profile("3", "Moderador"),
    ]
}

/// Built-in users loaded at startup; they reference [`profiles`] by id.
pub fn users() -> Vec<User> {
    vec![
        user(
            "1",
            ("João", "Costa"),
            "joao.costa@example.com",
            true,
            "1",
            day(15),
        ),
        user(
            "2",
            ("Maria", "Santos"),
            "maria.santos@example.com",
            true,
            "2",
            day(16),
        ),
        user(
            "3",
            ("Pedro", "Oliveira"),
            "pedro.oliveira@example.com",
            false,
            "3",
            day(17),
        ),
    ]
}
