diesel::table! {
    committees (id) {
        id -> Uuid,
        event_id -> Uuid,
        #[max_length = 255]
        name -> Text,
        max_members -> Int4,
    }
}

diesel::table! {
    events (id) {
        id -> Uuid,
        #[max_length = 255]
        name -> Text,
        description -> Nullable<Text>,
        start_date -> Timestamptz,
        end_date -> Timestamptz,
        created_at -> Timestamptz,
        created_by -> Uuid,
        #[max_length = 64]
        token -> Text,
        #[max_length = 64]
        ajk_token -> Text,
        group_link -> Nullable<Text>,
    }
}

diesel::table! {
    registrations (id) {
        id -> Uuid,
        #[max_length = 255]
        name -> Text,
        #[max_length = 64]
        matric_no -> Text,
        #[max_length = 320]
        email -> Text,
        #[max_length = 64]
        phone -> Text,
        committee_id -> Uuid,
        event_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    users (id) {
        id -> Uuid,
        #[max_length = 320]
        email -> Text,
        #[max_length = 255]
        password_hash -> Text,
        #[max_length = 32]
        role -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(committees -> events (event_id));
diesel::joinable!(events -> users (created_by));
diesel::joinable!(registrations -> committees (committee_id));
diesel::joinable!(registrations -> events (event_id));

diesel::allow_tables_to_appear_in_same_query!(committees, events, registrations, users,);
