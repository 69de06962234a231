diesel::table! {
    students (student_id) {
        student_id -> Integer,
        name -> Text,
        room_no -> Text,
        department -> Text,
        join_date -> Date,
    }
}

diesel::table! {
    daily_attendance (attendance_id) {
        attendance_id -> Integer,
        student_id -> Integer,
        date -> Date,
        meal_type -> Text,
        is_present -> Bool,
    }
}

diesel::table! {
    special_events (event_id) {
        event_id -> Integer,
        event_date -> Date,
        event_name -> Text,
        expected_impact -> Text,
    }
}

diesel::joinable!(daily_attendance -> students (student_id));

diesel::allow_tables_to_appear_in_same_query!(daily_attendance, students, special_events,);
