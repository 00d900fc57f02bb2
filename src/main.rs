use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use coa_pdf::{AssetPaths, Error, FieldMap, fields};

/// Generate a Certificate of Analysis PDF from form field values.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON object mapping field keys to values
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Start from the values the form is pre-filled with
    #[arg(long)]
    defaults: bool,

    /// Override a single field (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    overrides: Vec<(String, String)>,

    /// Directory holding the logo and footer images (default: $COA_ASSETS, else ./images)
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Output file name without extension
    #[arg(short, long, default_value = "COA")]
    filename: String,

    /// Directory the PDF is written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Print every field key with its label and default, then exit
    #[arg(long)]
    list_fields: bool,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn collect_fields(args: &Args) -> Result<FieldMap, Error> {
    let mut map = if args.defaults {
        FieldMap::with_form_defaults()
    } else {
        FieldMap::new()
    };
    if let Some(path) = &args.input {
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {}", e, path.display()),
            ))
        })?;
        map.extend(FieldMap::from_json(&json)?.iter());
    }
    map.extend(args.overrides.iter().cloned());

    let unknown = map.unknown_keys();
    if !unknown.is_empty() {
        log::warn!("ignoring unknown field(s): {}", unknown.join(", "));
    }
    Ok(map)
}

fn output_name(filename: &str) -> String {
    let stem = filename.trim();
    let stem = stem.strip_suffix(".pdf").unwrap_or(stem);
    format!("{}.pdf", if stem.is_empty() { "COA" } else { stem })
}

fn list_fields() {
    for (key, label, default) in fields::catalog() {
        println!("{key:<28} {label:<45} {default}");
    }
}

fn asset_paths(args: &Args) -> AssetPaths {
    match &args.assets {
        Some(dir) => AssetPaths::in_dir(dir),
        None => AssetPaths::from_env(),
    }
}

fn run(args: &Args) -> Result<PathBuf, Error> {
    let fields = collect_fields(args)?;
    let assets = asset_paths(args);
    let output = args.output_dir.join(output_name(&args.filename));
    coa_pdf::write_pdf(&fields, &assets, &output)?;
    Ok(output)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.list_fields {
        list_fields();
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(output) => {
            println!("COA PDF generated: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("coa-pdf").chain(argv.iter().copied()))
            .expect("parse args")
    }

    #[test]
    fn output_name_appends_extension_once() {
        assert_eq!(output_name("COA"), "COA.pdf");
        assert_eq!(output_name("batch-7.pdf"), "batch-7.pdf");
        assert_eq!(output_name("  report  "), "report.pdf");
        assert_eq!(output_name(""), "COA.pdf");
        assert_eq!(output_name(".pdf"), "COA.pdf");
    }

    #[test]
    fn key_value_pairs() {
        assert_eq!(
            parse_key_value("origin=Peru"),
            Ok(("origin".to_string(), "Peru".to_string()))
        );
        assert_eq!(
            parse_key_value("lead_spec=NMT 1 ppm = limit"),
            Ok(("lead_spec".to_string(), "NMT 1 ppm = limit".to_string()))
        );
        assert_eq!(
            parse_key_value("batch_no="),
            Ok(("batch_no".to_string(), String::new()))
        );
        assert!(parse_key_value("=value").is_err());
        assert!(parse_key_value("origin").is_err());
        assert!(Args::try_parse_from(["coa-pdf", "--set", "no-equals"]).is_err());
    }

    #[test]
    fn later_sources_win() {
        let dir = PathBuf::from("tests/output/cli_precedence");
        std::fs::create_dir_all(&dir).expect("create dir");
        let input = dir.join("fields.json");
        std::fs::write(&input, r#"{"origin": "Peru", "batch_no": "B-1"}"#).expect("write json");
        let input = input.to_string_lossy().into_owned();

        let parsed = args(&[
            "--defaults",
            "--input",
            &input,
            "--set",
            "origin=Chile",
            "--set",
            "quantity=25 kg",
        ]);
        let fields = collect_fields(&parsed).expect("collect");

        assert_eq!(fields.get("origin"), "Chile");
        assert_eq!(fields.get("batch_no"), "B-1");
        assert_eq!(fields.get("quantity"), "25 kg");
        assert_eq!(fields.get("product_name"), "X");
        assert_eq!(fields.len(), coa_pdf::fields::all_keys().len());
    }

    #[test]
    fn without_defaults_only_given_fields() {
        let fields = collect_fields(&args(&["--set", "product_name=Acme Extract"]))
            .expect("collect");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("product_name"), "Acme Extract");
    }

    #[test]
    fn bad_json_input_is_an_error() {
        let dir = PathBuf::from("tests/output/cli_bad_json");
        std::fs::create_dir_all(&dir).expect("create dir");
        let input = dir.join("fields.json");
        std::fs::write(&input, "[\"not\", \"an object\"]").expect("write json");
        let input = input.to_string_lossy().into_owned();

        let err = collect_fields(&args(&["--input", &input])).unwrap_err();
        assert!(matches!(err, Error::InvalidFieldMap(_)), "{err}");

        let missing = collect_fields(&args(&["--input", "tests/output/no/such.json"]));
        assert!(matches!(missing, Err(Error::Io(_))));
    }

    #[test]
    fn explicit_assets_dir_overrides_environment() {
        let parsed = args(&["--assets", "branding"]);
        assert_eq!(asset_paths(&parsed), AssetPaths::in_dir("branding"));
        if std::env::var_os("COA_ASSETS").is_none() {
            assert_eq!(asset_paths(&args(&[])), AssetPaths::in_dir("images"));
        }
    }

    #[test]
    fn output_lands_in_output_dir() {
        let parsed = args(&["--filename", "lot-9.pdf", "--output-dir", "out"]);
        assert_eq!(
            parsed.output_dir.join(output_name(&parsed.filename)),
            PathBuf::from("out/lot-9.pdf")
        );
    }
}
