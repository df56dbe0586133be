use axum::extract::Multipart;

/// Parsed fields of the `POST /data` form.
#[derive(Debug, PartialEq, Eq)]
pub struct DataForm {
    pub context_id: i64,
    /// In submission order.
    pub dataset_ids: Vec<i64>,
}

/// Parse `context_id` and the repeated `datasets` fields.
pub async fn parse_data_form(mut multipart: Multipart) -> Result<DataForm, String> {
    let mut context_id: Option<i64> = None;
    let mut dataset_ids: Vec<i64> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Failed to read form field: {}", e))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "context_id" => {
                let val = field
                    .text()
                    .await
                    .map_err(|e| format!("Failed to read context_id: {}", e))?;
                context_id = Some(parse_id("context_id", &val)?);
            }
            "datasets" => {
                let val = field
                    .text()
                    .await
                    .map_err(|e| format!("Failed to read datasets: {}", e))?;
                dataset_ids.push(parse_id("datasets", &val)?);
            }
            _ => {
                // Ignore unknown fields
                let _ = field.bytes().await;
            }
        }
    }

    let context_id = context_id.ok_or("context_id is required")?;
    if dataset_ids.is_empty() {
        return Err("No datasets selected".to_string());
    }

    Ok(DataForm {
        context_id,
        dataset_ids,
    })
}

fn parse_id(field: &str, value: &str) -> Result<i64, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("{field} must be an integer, got {value:?}"))
}
