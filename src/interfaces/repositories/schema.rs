use sqlx::PgPool;

/// Tables are created lazily, the first time any repository touches the pool.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS clients (
    id UUID PRIMARY KEY,
    slug TEXT NOT NULL UNIQUE,
    theme TEXT,
    color_theme TEXT,
    background_theme TEXT,
    password_hash TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS custom_themes (
    theme_id TEXT PRIMARY KEY,
    theme_name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    colors JSONB NOT NULL,
    custom_styles JSONB NOT NULL,
    backgrounds JSONB,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS custom_background_themes (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    backgrounds JSONB NOT NULL DEFAULT '{}'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS unified_themes (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    colors JSONB NOT NULL,
    custom_styles JSONB NOT NULL,
    backgrounds JSONB NOT NULL DEFAULT '{}'::jsonb,
    ornaments JSONB NOT NULL DEFAULT '[]'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS catalog_templates (
    id UUID PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    category TEXT NOT NULL,
    price BIGINT NOT NULL CHECK (price >= 0),
    url TEXT NOT NULL,
    badge TEXT,
    image_base64 TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_catalog_templates_category ON catalog_templates (category);

CREATE TABLE IF NOT EXISTS client_content (
    client_slug TEXT NOT NULL,
    content_type TEXT NOT NULL,
    content_data JSONB NOT NULL DEFAULT '{}'::jsonb,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    PRIMARY KEY (client_slug, content_type)
);

CREATE TABLE IF NOT EXISTS ornament_library (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    category TEXT,
    data TEXT NOT NULL,
    metadata JSONB NOT NULL DEFAULT '{}'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS bank_logos (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    category TEXT,
    data TEXT NOT NULL,
    metadata JSONB NOT NULL DEFAULT '{}'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS music_library (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    category TEXT,
    data TEXT NOT NULL,
    metadata JSONB NOT NULL DEFAULT '{}'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS guestbook_entries (
    id UUID PRIMARY KEY,
    client_slug TEXT NOT NULL,
    name TEXT NOT NULL,
    message TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_guestbook_entries_client ON guestbook_entries (client_slug, created_at DESC);

CREATE TABLE IF NOT EXISTS rsvps (
    id UUID PRIMARY KEY,
    client_slug TEXT NOT NULL,
    name TEXT NOT NULL,
    attendance TEXT NOT NULL CHECK (attendance IN ('attending', 'not_attending', 'maybe')),
    guest_count INTEGER NOT NULL DEFAULT 1,
    message TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_rsvps_client ON rsvps (client_slug, created_at DESC);
"#;

pub async fn create_tables(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    tracing::info!("Database schema is ready");
    Ok(())
}
