use calculators::{Primitive, Record};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "calc-host")]
#[command(about = "Run a calculator module through the cached, timed runtime")]
#[command(version)]
pub struct Cli {
    /// Calculator identifier (for example `bmi` or `compound-interest`)
    pub calculator: String,

    /// Inputs as `field=value` pairs
    #[arg(value_parser = parse_field)]
    pub inputs: Vec<(String, Primitive)>,

    /// JSON configuration file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Run the calculation this many times
    #[arg(long, short = 'n', default_value = "1")]
    pub repeat: usize,

    /// Print the performance report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn record(&self) -> Record {
        self.inputs.iter().cloned().collect()
    }
}

fn parse_field(s: &str) -> Result<(String, Primitive), String> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got '{}'", s))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("empty field name in '{}'", s));
    }
    let value = match value.parse::<Primitive>() {
        Ok(value) => value,
        Err(never) => match never {},
    };
    Ok((field.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field() {
        assert_eq!(
            parse_field("weightKg=70").unwrap(),
            ("weightKg".to_string(), Primitive::Number(70.0))
        );
        assert_eq!(
            parse_field("note=a=b").unwrap(),
            ("note".to_string(), Primitive::from("a=b"))
        );
        assert!(parse_field("weightKg").is_err());
        assert!(parse_field("=1").is_err());
    }

    #[test]
    fn test_cli_parses_inputs() {
        let cli = Cli::try_parse_from([
            "calc-host",
            "bmi",
            "weightKg=70",
            "heightCm=175",
            "--repeat",
            "3",
        ])
        .unwrap();

        assert_eq!(cli.calculator, "bmi");
        assert_eq!(cli.repeat, 3);
        let inputs = cli.record();
        assert_eq!(inputs["heightCm"], Primitive::Number(175.0));
        assert!(cli.config.is_none());
    }
}
