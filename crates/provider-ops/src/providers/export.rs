use std::io::Write;

use super::domain::ProviderRecord;

pub const EXPORT_FILE_NAME: &str = "validated_providers.csv";

const EXPORT_HEADER: [&str; 9] = [
    "provider_name",
    "specialty",
    "npi",
    "phone",
    "address",
    "risk_level",
    "validation_status",
    "confidence_score",
    "primary_issue",
];

pub fn write_provider_csv<W: Write>(
    writer: W,
    records: &[ProviderRecord],
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(EXPORT_HEADER)?;

    for record in records {
        let fields = &record.fields;
        let outcome = record.outcome();
        let score = format!("{:.2}", outcome.confidence_score);
        csv_writer.write_record([
            fields.provider_name.as_str(),
            fields.specialty.as_deref().unwrap_or_default(),
            fields.npi.as_deref().unwrap_or_default(),
            fields.phone.as_deref().unwrap_or_default(),
            fields.address.as_deref().unwrap_or_default(),
            outcome.risk_level.label(),
            outcome.validation_status.label(),
            score.as_str(),
            outcome.primary_issue.as_deref().unwrap_or_default(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn export_to_string(records: &[ProviderRecord]) -> Result<String, csv::Error> {
    let mut buffer = Vec::new();
    write_provider_csv(&mut buffer, records)?;
    String::from_utf8(buffer).map_err(|err| {
        csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::UserId;
    use crate::validation::ProviderFields;
    use chrono::Utc;

    fn records() -> Vec<ProviderRecord> {
        let owner = UserId("owner".to_string());
        vec![
            ProviderRecord::scored(
                owner.clone(),
                ProviderFields::new(
                    "Dr. Jane Smith",
                    Some("Cardiology"),
                    Some("1234567890"),
                    Some("5551234567"),
                    Some("123 Main Street"),
                ),
                None,
                Utc::now(),
            ),
            ProviderRecord::scored(
                owner,
                ProviderFields::new("Smith, Dr. Ann", None, None, None, None),
                None,
                Utc::now(),
            ),
        ]
    }

    #[test]
    fn export_mirrors_record_fields_in_column_order() {
        let csv = export_to_string(&records()).expect("export renders");
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "provider_name,specialty,npi,phone,address,risk_level,validation_status,confidence_score,primary_issue"
        );
        assert_eq!(
            lines[1],
            "Dr. Jane Smith,Cardiology,1234567890,5551234567,123 Main Street,Low,Validated,1.00,"
        );
        assert_eq!(
            lines[2],
            "\"Smith, Dr. Ann\",,,,,High,Needs Review,0.45,Specialty is missing."
        );
    }

    #[test]
    fn empty_export_still_has_header() {
        let csv = export_to_string(&[]).expect("export renders");
        assert_eq!(csv.lines().count(), 1);
    }
}
