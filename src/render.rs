//! Writes recipe outputs to a sink as JSON or CSV.

use std::io::Write;

use org_inspector::config::OutputFormat;
use org_inspector::error::AppError;
use org_inspector::{EntityRef, RecipeOutput};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ScoreRow {
    id: String,
    name: String,
    score: u32,
    #[serde(rename = "badReasonIds")]
    bad_reason_ids: String,
    #[serde(rename = "badFields")]
    bad_fields: String,
}

impl ScoreRow {
    fn from_entity(entity: &EntityRef) -> Self {
        let entity = entity.read();
        let name = entity
            .text("name")
            .ok()
            .flatten()
            .unwrap_or_default()
            .to_string();
        let (score, bad_reason_ids, bad_fields) = match entity.score() {
            Some(card) => (
                card.score(),
                card.bad_reason_ids()
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(";"),
                card.bad_fields().join(";"),
            ),
            None => (0, String::new(), String::new()),
        };
        Self {
            id: entity.id().unwrap_or_default().to_string(),
            name,
            score,
            bad_reason_ids,
            bad_fields,
        }
    }
}

pub fn render<W: Write>(output: &RecipeOutput, format: OutputFormat, out: W) -> Result<(), AppError> {
    match (format, output) {
        (OutputFormat::Json, _) => render_json(output, out),
        (OutputFormat::Csv, RecipeOutput::List(entities)) => render_csv(entities, out),
        (OutputFormat::Csv, RecipeOutput::Single(entity)) => {
            render_csv(std::slice::from_ref(entity), out)
        }
        (OutputFormat::Csv, other) => {
            tracing::warn!(kind = other.kind(), "csv only renders entity lists, writing json instead");
            render_json(output, out)
        }
    }
}

fn render_json<W: Write>(output: &RecipeOutput, mut out: W) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut out, output)?;
    writeln!(out)?;
    Ok(())
}

fn render_csv<W: Write>(entities: &[EntityRef], out: W) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);
    if entities.is_empty() {
        writer.write_record(["id", "name", "score", "badReasonIds", "badFields"])?;
    }
    for entity in entities {
        writer.serialize(ScoreRow::from_entity(entity))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use org_inspector::{EntityConfig, EntityFactory, EntityVariant};
    use serde_json::json;

    fn scored_field() -> EntityRef {
        let entity = EntityFactory::instance(EntityVariant::Field)
            .create_with_score(EntityConfig::new(json!({
                "id": "F1",
                "name": "Amount__c",
                "hardCodedURLs": ["https://example.my.salesforce.com"],
            })))
            .expect("field builds");
        EntityRef::new(entity)
    }

    fn rendered(output: &RecipeOutput, format: OutputFormat) -> String {
        let mut buffer = Vec::new();
        render(output, format, &mut buffer).expect("renders");
        String::from_utf8(buffer).expect("utf8 output")
    }

    #[test]
    fn csv_lists_one_row_per_entity() {
        let output = RecipeOutput::List(vec![scored_field()]);
        let text = rendered(&output, OutputFormat::Csv);
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("id,name,score,badReasonIds,badFields"));
        assert_eq!(lines.next(), Some("F1,Amount__c,1,44,hardCodedURLs"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn csv_of_an_empty_list_keeps_the_header() {
        let text = rendered(&RecipeOutput::List(Vec::new()), OutputFormat::Csv);
        assert_eq!(text.trim_end(), "id,name,score,badReasonIds,badFields");
    }

    #[test]
    fn json_renders_full_entities() {
        let output = RecipeOutput::List(vec![scored_field()]);
        let value: serde_json::Value =
            serde_json::from_str(&rendered(&output, OutputFormat::Json)).expect("valid json");
        assert_eq!(value[0]["name"], json!("Amount__c"));
        assert_eq!(value[0]["badReasonIds"], json!([44]));
    }

    #[test]
    fn csv_falls_back_to_json_for_maps() {
        let output = RecipeOutput::Map([("ViewSetup".to_string(), json!(true))].into_iter().collect());
        let value: serde_json::Value =
            serde_json::from_str(&rendered(&output, OutputFormat::Csv)).expect("valid json");
        assert_eq!(value["ViewSetup"], json!(true));
    }
}
