//! Writes small demo files (`sample_data.csv` / `sample_data.xlsx`) with
//! holes punched into the numeric columns, for exercising the app by hand.

use rust_xlsxwriter::Workbook;

const HEADER: [&str; 4] = ["station", "temperature_c", "humidity_pct", "status"];

/// One sensor reading per row; `None` marks a hole the cleaner should fill.
const ROWS: [(&str, Option<f64>, Option<f64>, &str); 8] = [
    ("north", Some(21.4), Some(61.0), "ok"),
    ("north", None, Some(58.5), "ok"),
    ("north", Some(19.9), None, "degraded"),
    ("east", Some(23.8), Some(54.0), "ok"),
    ("east", Some(24.1), Some(52.5), "ok"),
    ("south", None, None, "offline"),
    ("south", Some(26.7), Some(47.0), "ok"),
    ("west", Some(18.2), Some(66.5), "ok"),
];

fn main() {
    write_csv("sample_data.csv").expect("Failed to write sample_data.csv");
    write_xlsx("sample_data.xlsx").expect("Failed to write sample_data.xlsx");
    println!(
        "Wrote {} readings to sample_data.csv and sample_data.xlsx",
        ROWS.len()
    );
}

fn write_csv(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADER)?;
    for (station, temperature, humidity, status) in ROWS {
        writer.write_record([
            station.to_string(),
            temperature.map(|v| v.to_string()).unwrap_or_default(),
            humidity.map(|v| v.to_string()).unwrap_or_default(),
            status.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_xlsx(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in HEADER.iter().enumerate() {
        worksheet.write_string(0, col as u16, *name)?;
    }
    for (row, (station, temperature, humidity, status)) in ROWS.iter().enumerate() {
        let row = row as u32 + 1;
        worksheet.write_string(row, 0, *station)?;
        if let Some(v) = temperature {
            worksheet.write_number(row, 1, *v)?;
        }
        if let Some(v) = humidity {
            worksheet.write_number(row, 2, *v)?;
        }
        worksheet.write_string(row, 3, *status)?;
    }

    workbook.save(path)?;
    Ok(())
}
