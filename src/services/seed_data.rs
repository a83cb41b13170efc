use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;
use uuid::Uuid;

const DEFAULT_ADMIN_EMAIL: &str = "admin@vertex.local";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Marketing catalog seeded on first boot: (slug, title, description).
const SERVICE_CATALOG: &[(&str, &str, &str)] = &[
    (
        "consultoria",
        "Consultoria Empresarial",
        "Da criação de branding e precificação ao plano de ação estratégico. Análise de mercado e da concorrência para posicionar sua empresa no topo.",
    ),
    (
        "websites",
        "Construção de Websites",
        "Sites institucionais e e-commerce de alta performance. Design exclusivo, velocidade e conversão focados em resultados reais.",
    ),
    (
        "sistemas",
        "Desenvolvimento de Sistemas",
        "Soluções sob medida para gestão completa: Estoque, CRM, Financeiro e interação com cliente. O controle total da sua empresa em um só lugar.",
    ),
    (
        "ia",
        "Inteligência Artificial",
        "Agentes de IA que trabalham por você: atendem, vendem, agendam e organizam. A revolução operacional para sua empresa.",
    ),
];

pub async fn seed_initial_data(pool: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        tracing::info!("Database already has data, skipping seed");
        return Ok(());
    }

    tracing::info!("Seeding default admin '{}'...", DEFAULT_ADMIN_EMAIL);

    let admin_id = Uuid::new_v4();
    let password_hash = hash(DEFAULT_ADMIN_PASSWORD, DEFAULT_COST)?;
    sqlx::query(
        r#"
        INSERT INTO profiles (id, email, password_hash, role, language, is_colab, created_at)
        VALUES ($1, $2, $3, 'admin', 'pt-BR', false, NOW())
        "#,
    )
    .bind(admin_id)
    .bind(DEFAULT_ADMIN_EMAIL)
    .bind(&password_hash)
    .execute(pool)
    .await?;

    for (slug, title, description) in SERVICE_CATALOG {
        sqlx::query(
            "INSERT INTO services (id, slug, title, description, active) VALUES ($1, $2, $3, $4, true)",
        )
        .bind(Uuid::new_v4())
        .bind(slug)
        .bind(title)
        .bind(description)
        .execute(pool)
        .await?;
    }

    tracing::info!("Default admin and service catalog created");
    Ok(())
}
