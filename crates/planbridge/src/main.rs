mod table_arg;

use std::collections::BTreeMap;
use std::io;
use std::sync::Arc;

use clap::Parser;
use planbridge_core::catalog::Schema;
use planbridge_core::config::PlannerConfig;
use planbridge_core::errors::{PlanError, Result};
use planbridge_core::explain::{ExplainConfig, Explainable};
use planbridge_core::functions::operator_table::OperatorTable;
use planbridge_core::planner::Planner;
use planbridge_core::table::ToRelContext;
use planbridge_core::validate::Validated;
use table_arg::parse_table_arg;

#[derive(Parser)]
#[clap(name = "planbridge")]
struct Arguments {
    /// Table to resolve columns against, as `name:col TYPE [NOT NULL],...`.
    ///
    /// May be given multiple times.
    #[clap(long = "table")]
    tables: Vec<String>,
    /// Print output as JSON.
    #[clap(long)]
    json: bool,
    /// Render keywords in lower case.
    #[clap(long)]
    lowercase_keywords: bool,
    /// Check that rendered SQL parses and binds back to the same expression.
    #[clap(long)]
    verify: bool,
    /// Print the signatures of a function.
    #[clap(long)]
    describe: Option<String>,
    /// Print the plan for scanning a table.
    #[clap(long)]
    explain: Option<String>,
    /// Log level, overridden by RUST_LOG.
    #[clap(long, default_value = "error")]
    log_level: tracing::Level,
    /// Expressions to plan.
    #[clap(trailing_var_arg = true)]
    exprs: Vec<String>,
}

/// Formats and validates SQL expressions.
fn main() {
    let args = Arguments::parse();
    logutil::configure_global_logger(args.log_level, logutil::LogFormat::HumanReadable, io::stderr);

    if let Err(err) = inner(args) {
        println!("ERROR: {err}");
        std::process::exit(1);
    }
}

fn inner(args: Arguments) -> Result<()> {
    let config = PlannerConfig {
        lowercase_keywords: args.lowercase_keywords,
        verify_unparse: args.verify,
        ..Default::default()
    };

    let mut schemas: BTreeMap<String, Schema> = BTreeMap::new();
    let mut table_names = Vec::new();
    for arg in &args.tables {
        let table = parse_table_arg(arg)?;
        let schema_name = table
            .schema
            .unwrap_or_else(|| config.default_schema.clone());
        table_names.push(format!("{schema_name}.{}", table.definition.name));

        let schema = schemas
            .remove(&schema_name)
            .unwrap_or_else(|| Schema::new(schema_name.clone()));
        schemas.insert(schema_name, schema.with_table(table.definition)?);
    }

    let planner = Planner::new(
        config,
        OperatorTable::builtin(),
        schemas.into_values().map(Arc::new),
    );

    if let Some(name) = &args.describe {
        let desc = planner
            .describe_function(name)
            .ok_or_else(|| PlanError::Config(format!("Unknown function '{name}'")))?;
        if args.json {
            println!("{}", to_json(&desc)?);
        } else {
            println!("{} ({})", desc.name, desc.category);
            for sig in &desc.signatures {
                println!("  {sig}");
            }
        }
    }

    if let Some(table) = &args.explain {
        let scan = planner.scan(table, &ToRelContext::default())?;
        let entry = scan.explain_entry(ExplainConfig { verbose: true });
        if args.json {
            println!("{}", to_json(&entry)?);
        } else {
            println!("{entry}");
        }
    }

    let scope: Vec<_> = table_names.iter().map(|s| s.as_str()).collect();
    for expr in &args.exprs {
        let planned = planner.plan_expr(expr, &scope)?;
        let ty = match planned.validated {
            Validated::Type(t) => Some(t.to_string()),
            Validated::Deferred => None,
        };

        if args.json {
            let out = serde_json::json!({
                "sql": planned.sql,
                "type": ty,
            });
            println!("{out}");
        } else {
            println!("{}\t{}", planned.sql, ty.as_deref().unwrap_or("deferred"));
        }
    }

    Ok(())
}

fn to_json(value: &impl serde::Serialize) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| PlanError::Config(e.to_string()))
}
