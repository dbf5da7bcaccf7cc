use clap::{Parser, ValueEnum};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use dynsql::{Dialect, ExpressionBuilder, Params, RenderedSql, Settings, TemplateDocument};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// dynsql - render a statement template
#[derive(Parser, Debug)]
#[command(name = "dynsql")]
#[command(about = "Render a dynamic SQL template against JSON parameters", long_about = None)]
struct Args {
    /// Statement template (JSON)
    #[arg(short, long)]
    template: PathBuf,

    /// Parameters (JSON object); no parameters if omitted
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Target dialect: postgres, mysql, sqlite, mssql, oracle
    #[arg(short, long)]
    dialect: Option<String>,

    /// Config file (default: ./dynsql.toml or /etc/dynsql/dynsql.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log the rendered statement
    #[arg(long)]
    show_sql: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

/// Loads settings with priority: CLI args > ENV > config file > defaults
fn load_settings(args: &Args) -> Result<Settings, dynsql::DynSqlError> {
    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(dialect) = &args.dialect {
        settings.dialect = dialect.parse::<Dialect>()?;
    }
    settings.show_sql |= args.show_sql;
    Ok(settings)
}

fn print_table(rendered: &RenderedSql, dialect: Dialect) {
    println!("{}", rendered.sql);
    if rendered.params.is_empty() {
        println!("(0 params)");
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![Cell::new("placeholder"), Cell::new("type"), Cell::new("value")]);
    for (i, value) in rendered.params.iter().enumerate() {
        table.add_row(vec![
            Cell::new(dialect.placeholder().format(i)),
            Cell::new(value.type_name()),
            Cell::new(value),
        ]);
    }
    println!("{table}\n({} params)", rendered.params.len());
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let settings = load_settings(&args)?;

    let document = TemplateDocument::from_json(&std::fs::read_to_string(&args.template)?)?;
    let statement = document.compile(&ExpressionBuilder::default())?;

    let params = match &args.params {
        Some(path) => Params::from_json(serde_json::from_str(&std::fs::read_to_string(path)?)?)?,
        None => Params::new(),
    };

    let rendered = statement.render(&settings, &params)?;
    match args.format {
        OutputFormat::Table => print_table(&rendered, settings.dialect),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rendered)?),
    }
    Ok(())
}
