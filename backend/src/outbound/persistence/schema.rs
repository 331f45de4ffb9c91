//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Employee records.
    employees (id) {
        id -> Int8,
        name -> Text,
        address -> Text,
        phone -> Text,
        gender -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Stored report designs. A partial unique index allows one active row
    /// per `report_type`.
    report_templates (id) {
        id -> Int8,
        name -> Text,
        content -> Text,
        report_type -> Varchar,
        is_active -> Bool,
        description -> Nullable<Text>,
        revision -> Int4,
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(employees, report_templates);
