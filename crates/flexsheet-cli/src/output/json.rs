use flexsheet_core::error::FlexsheetError;
use serde::Serialize;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), FlexsheetError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
