//! `vmfix import` – generate a route-metric series and import it.

use anyhow::Result;
use vmfix_core::model::{RouteLabels, SampleValue, ValueSpec};
use vmfix_core::{ImportRequest, MetricsClient};

use crate::cli::ImportArgs;

pub fn run_import(client: &MetricsClient, args: &ImportArgs) -> Result<()> {
    let request = build_request(args)?;
    let data = client.import_generated(&request)?;
    println!(
        "Imported {} samples for {}",
        data.len(),
        request.delete_selector()
    );
    Ok(())
}

pub(crate) fn build_request(args: &ImportArgs) -> Result<ImportRequest> {
    let mut request = ImportRequest::new(args.name.as_str());
    request.route = RouteLabels {
        security: args.security.clone(),
        step_count: args.step_count,
        risk_name: args.risk_name.clone(),
    };
    request.window = Some(args.window.window()?);
    request.step_secs = args.window.step;
    request.values = value_spec(args);
    request.delete_first = !args.keep_existing;
    Ok(request)
}

/// Whole `--value`s are sent as integers, like the random ones.
fn value_spec(args: &ImportArgs) -> ValueSpec {
    match args.value {
        Some(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => {
            ValueSpec::Fixed(SampleValue::Int(v as i64))
        }
        Some(v) => ValueSpec::Fixed(SampleValue::Float(v)),
        None => ValueSpec::Random {
            min: args.min,
            max: args.max,
        },
    }
}
