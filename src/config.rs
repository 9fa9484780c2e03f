use clap::Args;

/// Connection and sizing settings shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    #[arg(long, env = "SKILLGAP_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,

    /// Alumni sampled from the student's branch
    #[arg(long, env = "SKILLGAP_POPULATION_LIMIT", default_value_t = 100)]
    pub population_limit: i64,

    /// Most recent approved job postings considered
    #[arg(long, env = "SKILLGAP_JOB_LIMIT", default_value_t = 50)]
    pub job_limit: i64,

    /// Industry skills compared by the `industry` command
    #[arg(long, env = "SKILLGAP_INDUSTRY_LIMIT", default_value_t = 50)]
    pub industry_limit: i64,

    /// How long branch aggregates are reused when analyzing a cohort
    #[arg(long, env = "SKILLGAP_CACHE_TTL_SECS", default_value_t = 300)]
    pub cache_ttl_secs: i64,
}
