use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            email VARCHAR(255) NOT NULL UNIQUE,
            name VARCHAR(255) NOT NULL,
            password_hash VARCHAR(255) NOT NULL,
            role VARCHAR(16) NOT NULL CHECK (role IN ('TEACHER', 'STUDENT')),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create sessions table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create timetables table; the unique index makes "one active timetable
    // per key" a database guarantee rather than an application convention
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS timetables (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            department VARCHAR(32) NOT NULL,
            year INTEGER NOT NULL CHECK (year BETWEEN 1 AND 4),
            academic_year VARCHAR(16) NOT NULL,
            section VARCHAR(4) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT unique_timetable_key UNIQUE (department, year, academic_year, section)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create slot_assignments table; times are zero-padded HH:MM so string
    // comparison orders chronologically
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS slot_assignments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            timetable_id UUID NOT NULL REFERENCES timetables(id) ON DELETE CASCADE,
            day VARCHAR(16) NOT NULL,
            start_time VARCHAR(5) NOT NULL,
            end_time VARCHAR(5) NOT NULL,
            subject VARCHAR(255) NOT NULL,
            subject_code VARCHAR(64) NOT NULL,
            professor VARCHAR(255) NOT NULL,
            CONSTRAINT valid_time_range CHECK (end_time > start_time),
            CONSTRAINT unique_cell UNIQUE (timetable_id, day, start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_slot_assignments_timetable_id ON slot_assignments(timetable_id);
        CREATE INDEX IF NOT EXISTS idx_slot_assignments_start_time ON slot_assignments(start_time);
        CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id);
        CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
