//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts with their password hash and profile data.
    profiles (id) {
        id -> Uuid,
        /// Lower-cased, unique.
        email -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Varchar,
        display_name -> Varchar,
        /// `GURU` or `MURID`.
        role -> Varchar,
        /// Required for `MURID`, always null for `GURU`.
        class_label -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Submitted lab reports, one public URL column per category and side.
    reports (id) {
        id -> Uuid,
        owner_id -> Uuid,
        submitted_at -> Timestamptz,
        /// `DIPROSES`, `DITERIMA`, or `DITOLAK`.
        status -> Varchar,
        ringkas_before -> Text,
        ringkas_after -> Text,
        rapi_before -> Text,
        rapi_after -> Text,
        resik_before -> Text,
        resik_after -> Text,
        rawat_before -> Text,
        rawat_after -> Text,
        rajin_before -> Text,
        rajin_after -> Text,
    }
}

diesel::joinable!(reports -> profiles (owner_id));

diesel::allow_tables_to_appear_in_same_query!(profiles, reports);
