#![cfg(feature = "json")]

use gridconf::{CompileOptions, Page, TableDefinition, Value, compile, compile_definitions, json};

fn pages() -> Vec<Page> {
    vec![
        Page::from_rows(
            "Items",
            vec![
                vec!["#Rarity", "", "", "", "#Tuning"],
                vec!["id", "weight", "", "", "id", "type", "value", "comment"],
                vec!["string", "float", "", "", "drop rate", "float", "0,25", "per kill"],
                vec!["common", "1.0", "", "", "boss", "Gear", "sword"],
                vec!["rare", "0.1", "", "", "tags", r#"string["|"]"#, r#"a|"b|c""#],
            ],
        ),
        Page::from_rows(
            "Gear",
            vec![
                vec!["id", "rarity", "stats.name", "stats.value"],
                vec!["string", "Rarity", "Stat:string", "float[]"],
                vec!["sword", "rare", "atk", "1"],
                vec!["", "", "", "2"],
                vec!["", "", "def", "0.5"],
                vec!["!broken", "common"],
                vec!["shield", "common", "def", "3"],
            ],
        ),
    ]
}

#[test]
fn definitions_survive_json_and_bind_identically() {
    let direct = compile(&pages(), &CompileOptions::default()).unwrap();

    let text = json::to_string(&direct.definitions).unwrap();
    let loaded = json::from_str(&text).unwrap();
    assert_eq!(loaded, direct.definitions);

    let pretty = json::to_string_pretty(&direct.definitions).unwrap();
    assert_eq!(json::from_str(&pretty).unwrap(), direct.definitions);

    let rebound = compile_definitions(loaded, &CompileOptions::default()).unwrap();
    assert_eq!(rebound.model, direct.model);
}

#[test]
fn json_is_tagged_by_kind() {
    let direct = compile(&pages(), &CompileOptions::default()).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&json::to_string(&direct.definitions).unwrap()).unwrap();
    let kinds: Vec<_> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["kind"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(kinds, vec!["database", "value", "database"]);
}

#[test]
fn bound_model_content() {
    let out = compile(&pages(), &CompileOptions::default()).unwrap();
    let gear = out.model.table("Gear").unwrap();
    assert_eq!(gear.len(), 2);

    let sword = gear.get("sword").unwrap();
    let stats = sword.field("Stats").unwrap().as_array().unwrap();
    assert_eq!(stats.len(), 2);
    assert_eq!(
        stats[0].as_record().unwrap().get("Value"),
        Some(&Value::Array(vec![1.0.into(), 2.0.into()]))
    );

    let tuning = out.model.table("Tuning").unwrap();
    assert_eq!(tuning.get("DropRate").unwrap().value.as_float(), Some(0.25));
    let tags = tuning.get("Tags").unwrap().value.as_array().unwrap();
    assert_eq!(tags, &[Value::from("a"), Value::from("b|c")]);

    let model_json = json::model_to_string_pretty(&out.model).unwrap();
    assert!(model_json.contains("\"sword\""));
}

#[test]
fn malformed_json_is_an_error() {
    let err = json::from_str(r#"[{"kind": "spreadsheet"}]"#).unwrap_err();
    assert!(err.is_data());
    let empty: Vec<TableDefinition> = json::from_str("[]").unwrap();
    assert!(empty.is_empty());
}
