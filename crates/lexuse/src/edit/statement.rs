//! Wikibase JSON for a usage example statement.

use chrono::NaiveDate;
use serde_json::{Value, json};

use crate::services::CorpusProvenance;

use super::UsageExampleEdit;

/// Usage example.
pub const USAGE_EXAMPLE: &str = "P5831";
/// Subject form.
pub const SUBJECT_FORM: &str = "P5830";
/// Subject sense.
pub const SUBJECT_SENSE: &str = "P6072";
/// Stated in.
pub const STATED_IN: &str = "P248";
/// Retrieved.
pub const RETRIEVED: &str = "P813";
/// Publication date.
pub const PUBLICATION_DATE: &str = "P577";

/// Proleptic Gregorian calendar.
const GREGORIAN: &str = "http://www.wikidata.org/entity/Q1985727";

/// Day precision.
const PRECISION_DAY: u8 = 11;

/// Build the statement: the sentence as monolingual text, qualified by the
/// form and the sense, referenced by corpus, document, retrieval date and
/// publication date.
pub fn usage_example_statement(
    edit: &UsageExampleEdit,
    language: &str,
    provenance: &CorpusProvenance,
) -> Value {
    json!({
        "mainsnak": snak(
            USAGE_EXAMPLE,
            "monolingualtext",
            json!({"text": edit.sentence, "language": language}),
            "monolingualtext",
        ),
        "type": "statement",
        "rank": "normal",
        "qualifiers": {
            SUBJECT_FORM: [entity_snak(SUBJECT_FORM, "form", &edit.form_id)],
            SUBJECT_SENSE: [entity_snak(SUBJECT_SENSE, "sense", &edit.sense_id)],
        },
        "qualifiers-order": [SUBJECT_FORM, SUBJECT_SENSE],
        "references": [{
            "snaks": {
                STATED_IN: [entity_snak(STATED_IN, "item", &provenance.stated_in)],
                provenance.document_property.as_str(): [snak(
                    &provenance.document_property,
                    "string",
                    json!(edit.source_document_id),
                    "external-id",
                )],
                RETRIEVED: [time_snak(RETRIEVED, edit.fetch_date)],
                PUBLICATION_DATE: [time_snak(PUBLICATION_DATE, edit.publication_date)],
            },
            "snaks-order": [STATED_IN, provenance.document_property, RETRIEVED, PUBLICATION_DATE],
        }],
    })
}

fn snak(property: &str, value_type: &str, value: Value, datatype: &str) -> Value {
    json!({
        "snaktype": "value",
        "property": property,
        "datavalue": {"value": value, "type": value_type},
        "datatype": datatype,
    })
}

fn entity_snak(property: &str, entity_type: &str, id: &str) -> Value {
    let datatype = format!("wikibase-{}", entity_type);
    snak(
        property,
        "wikibase-entityid",
        json!({"entity-type": entity_type, "id": id}),
        &datatype,
    )
}

fn time_snak(property: &str, date: NaiveDate) -> Value {
    snak(
        property,
        "time",
        json!({
            "time": wikibase_time(date),
            "timezone": 0,
            "before": 0,
            "after": 0,
            "precision": PRECISION_DAY,
            "calendarmodel": GREGORIAN,
        }),
        "time",
    )
}

/// Wikibase time string of a date, truncated to the day.
pub fn wikibase_time(date: NaiveDate) -> String {
    date.format("+%Y-%m-%dT00:00:00Z").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit() -> UsageExampleEdit {
        UsageExampleEdit {
            entry_id: "L35455".to_string(),
            form_id: "L35455-F2".to_string(),
            sense_id: "L35455-S1".to_string(),
            sentence: "Bankerna bär risken.".to_string(),
            source_document_id: "H501FiU1".to_string(),
            publication_date: NaiveDate::from_ymd_opt(2017, 10, 12).unwrap(),
            fetch_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        }
    }

    fn provenance() -> CorpusProvenance {
        CorpusProvenance {
            stated_in: "Q21592569".to_string(),
            document_property: "P8433".to_string(),
        }
    }

    #[test]
    fn test_main_value_is_monolingual_sentence() {
        let statement = usage_example_statement(&edit(), "sv", &provenance());
        let value = &statement["mainsnak"]["datavalue"]["value"];
        assert_eq!(statement["mainsnak"]["property"], "P5831");
        assert_eq!(value["text"], "Bankerna bär risken.");
        assert_eq!(value["language"], "sv");
    }

    #[test]
    fn test_qualifiers_link_form_and_sense() {
        let statement = usage_example_statement(&edit(), "sv", &provenance());
        let form = &statement["qualifiers"]["P5830"][0]["datavalue"]["value"];
        let sense = &statement["qualifiers"]["P6072"][0]["datavalue"]["value"];
        assert_eq!(form["id"], "L35455-F2");
        assert_eq!(form["entity-type"], "form");
        assert_eq!(sense["id"], "L35455-S1");
        assert_eq!(statement["qualifiers"]["P6072"][0]["datatype"], "wikibase-sense");
    }

    #[test]
    fn test_reference_carries_provenance_and_dates() {
        let statement = usage_example_statement(&edit(), "sv", &provenance());
        let snaks = &statement["references"][0]["snaks"];
        assert_eq!(snaks["P248"][0]["datavalue"]["value"]["id"], "Q21592569");
        assert_eq!(snaks["P8433"][0]["datavalue"]["value"], "H501FiU1");
        assert_eq!(snaks["P813"][0]["datavalue"]["value"]["time"], "+2024-05-01T00:00:00Z");
        assert_eq!(snaks["P577"][0]["datavalue"]["value"]["time"], "+2017-10-12T00:00:00Z");
        assert_eq!(snaks["P577"][0]["datavalue"]["value"]["precision"], 11);
        assert_eq!(
            statement["references"][0]["snaks-order"],
            json!(["P248", "P8433", "P813", "P577"])
        );
    }
}
