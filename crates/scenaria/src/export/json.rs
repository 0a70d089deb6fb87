//! JSON export of the system model.
//!
//! Field names are snake_case and enum tags lower-case, following the
//! `Serialize` derives on the model types. Ids are written as plain strings.

use log::debug;

use scenaria_core::model::SystemModel;

use super::{Error, Exporter};

/// Serializes models with `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter {
    pretty: bool,
}

impl JsonExporter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Exporter for JsonExporter {
    fn export(&self, model: &SystemModel) -> Result<String, Error> {
        debug!(pretty = self.pretty; "Serializing model to JSON");
        let json = if self.pretty {
            serde_json::to_string_pretty(model)?
        } else {
            serde_json::to_string(model)?
        };
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use scenaria_parser::{ElaborateConfig, parse};

    use super::*;

    fn export(source: &str) -> Value {
        let model = parse(source, ElaborateConfig::default()).unwrap();
        let text = JsonExporter::new(false).export(&model).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn test_channel_and_step_shape() {
        let value = export("agent 'AA' as aa; agent 'BB' as bb; 'S' { aa -('')-> bb; };");

        assert_eq!(
            value["channels"][0],
            json!({
                "id": "aa-req_res->bb",
                "kind": "req_res",
                "from": "aa",
                "to": "bb",
                "text": "",
            })
        );
        assert_eq!(
            value["scenarios"][0],
            json!({
                "name": "S",
                "steps": [{ "kind": "req", "channel": "aa-req_res->bb", "message": "--" }],
            })
        );
    }

    #[test]
    fn test_container_members_are_flattened() {
        let value = export("container 'Front' as fe { agent 'UI' as ui };");

        let container = &value["containers"]["fe"];
        assert_eq!(container["name"], "Front");
        assert_eq!(container["actors"], json!(["ui"]));
        assert_eq!(container["containers"], json!([]));
        assert!(container.get("container").is_none());
        assert_eq!(value["actors"][0]["container"], "fe");
    }

    #[test]
    fn test_pretty_output_is_indented() {
        let model = parse("user 'U' as u;", ElaborateConfig::default()).unwrap();
        let pretty = JsonExporter::new(true).export(&model).unwrap();
        let compact = JsonExporter::new(false).export(&model).unwrap();
        assert!(pretty.contains('\n'));
        assert!(!compact.contains('\n'));
    }
}
