use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Render a pairs plot of synthetic correlated samples")]
pub struct DemoArgs {
    /// Path to config TOML (written with commented defaults if missing)
    #[arg(long, default_value = "pears.toml")]
    pub config: String,

    /// Output PNG path
    #[arg(long, default_value = "target/plots/pairs.png")]
    pub out: String,

    /// Number of variables
    #[arg(long, default_value_t = 3)]
    pub vars: usize,

    /// Samples per variable
    #[arg(long, default_value_t = 2000)]
    pub samples: usize,

    /// RNG seed
    #[arg(long, default_value_t = 7)]
    pub seed: u64,

    /// Mark the generating means as truths
    #[arg(long, default_value_t = false)]
    pub truths: bool,

    /// Use a name-keyed dataset instead of positional columns
    #[arg(long, default_value_t = false)]
    pub named: bool,
}
