use flexsheet_core::config::Settings;
use flexsheet_core::error::FlexsheetError;
use flexsheet_core::export::stamp::StampOptions;
use flexsheet_core::parsing::ExtractOptions;
use std::path::PathBuf;

use crate::commands::extractor;

pub struct SignArgs {
    pub input_file: PathBuf,
    pub signature: Option<PathBuf>,
    pub manager: Option<String>,
    pub output_folder: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub backend: String,
}

pub fn run(args: SignArgs) -> Result<(), FlexsheetError> {
    // Flags override the settings file
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(signature) = args.signature {
        settings.signature = Some(signature);
    }
    if let Some(manager) = args.manager {
        settings.manager = manager;
    }
    if let Some(folder) = args.output_folder {
        settings.output_folder = folder;
    }

    let Some(signature_path) = settings.signature.as_ref() else {
        return Err(FlexsheetError::Config {
            path: args.config.unwrap_or_default(),
            reason: "no signature image given (use --signature or set \"signature\")".into(),
        });
    };

    let pdf_bytes = std::fs::read(&args.input_file)?;
    let signature = std::fs::read(signature_path)?;
    let extractor = extractor(&args.backend)?;

    let extract = ExtractOptions {
        company_name: settings.company_name.clone(),
        ..ExtractOptions::default()
    };
    let stamp = StampOptions {
        approval: flexsheet_core::approve_today(settings.manager.clone()),
        signature_height: settings.signature_height,
    };

    let outputs = flexsheet_core::build_outputs(
        &pdf_bytes,
        extractor.as_ref(),
        &signature,
        &extract,
        &stamp,
    )?;
    let [pdf_path, excel_path] = outputs.write_to(&settings.output_folder)?;

    eprintln!(
        "Signed {} ({} row(s), {} hours)",
        outputs.document.consultant_name,
        outputs.document.timesheet.len(),
        outputs.document.total_hours()
    );
    println!("{}", pdf_path.display());
    println!("{}", excel_path.display());
    Ok(())
}
