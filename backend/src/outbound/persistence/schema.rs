//! Diesel table definitions mirroring `backend/migrations`.

diesel::table! {
    /// Registered accounts. `email` is unique.
    users (id) {
        id -> Uuid,
        name -> Text,
        email -> Text,
        password_hash -> Text,
        assistant_name -> Nullable<Text>,
        assistant_image -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only command log; `id` orders entries chronologically.
    user_history (id) {
        id -> Int8,
        user_id -> Uuid,
        command -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(user_history -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(users, user_history);
