use clap::Parser;

/// # Config
/// Command line options of the `symdiff` tool.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "symdiff", version, about = "Differentiate arithmetic expressions in x")]
pub struct Config {
    /// Differentiate this expression and exit instead of prompting.
    pub expression: Option<String>,

    /// Value announced for x in the stack-machine listing.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub at: f64,

    /// Also list the stack code of the expression itself.
    #[arg(long)]
    pub show_original: bool,

    /// Also print the value of the derivative at x.
    #[arg(long)]
    pub evaluate: bool,

    /// Print one JSON object per line.
    #[arg(long)]
    pub json: bool,
}

impl Config {
    pub fn new() -> Self {
        Config::default()
    }

    pub fn with_at(mut self, at: f64) -> Self {
        self.at = at;
        self
    }

    pub fn with_show_original(mut self, show_original: bool) -> Self {
        self.show_original = show_original;
        self
    }

    pub fn with_evaluate(mut self, evaluate: bool) -> Self {
        self.evaluate = evaluate;
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}
