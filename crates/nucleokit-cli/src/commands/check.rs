use crate::cli::CheckArgs;
use crate::error::Result;
use nucleokit::core::chemistry::rules;
use tracing::info;

pub fn run(args: CheckArgs) -> Result<()> {
    println!("{}", verdict(&args));
    Ok(())
}

fn verdict(args: &CheckArgs) -> String {
    info!(first = %args.first, second = %args.second, "Checking connection rules.");
    match rules::evaluate(&args.first, &args.second) {
        Ok(bond) => format!(
            "✓ {} and {} can connect with a {} ({}).",
            args.first,
            args.second,
            bond.description(),
            bond
        ),
        Err(reason) => format!(
            "✗ {} and {} cannot connect: {}.",
            args.first, args.second, reason
        ),
    }
}
