//! Diesel schema for task persistence.

diesel::table! {
    /// Task records keyed by their public identifier.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Creation input object.
        input -> Jsonb,
        /// Output object, null until the first update.
        output -> Nullable<Jsonb>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
