use gridconf_parse::{
    ArrayKind, GridParser, Page, ParseOptions, TableDefinition, TableKind, Tokenizer, parse,
    parse_grid,
};
use proptest::prelude::*;

fn workbook_page() -> Page {
    Page::from_rows(
        "Balance",
        vec![
            vec!["#Settings", "", "", "", "", "#Rarity"],
            vec!["id", "type", "value", "comment", "", "id", "weight", "color"],
            vec!["max bots", "int", "0x20", "cap", "", "string", "float", ""],
            vec!["names", "string[|]", r#"Ann|Bob|"C|D""#, "", "", "common", "1.0", "grey"],
            vec!["round time", "minutes", "", "", "", "rare", "0.2", "blue"],
            vec!["", "", "2.5", "", "", "END"],
            vec![],
            vec!["#Bots"],
            vec!["id", "name", "rarity", "loot.item", "loot.count"],
            vec!["", "", "Rarity", "Loot:string", "int"],
            vec!["1", "Scout", "rare", "gem", "2"],
            vec!["", "Tank", "common", "", ""],
            vec!["END"],
        ],
    )
}

#[test]
fn scans_every_table_in_a_page() {
    let (tables, diags) = parse(&workbook_page()).into_parts();
    assert!(diags.is_empty(), "{diags:?}");
    let shapes: Vec<_> = tables.iter().map(|t| (t.name().to_string(), t.kind())).collect();
    assert_eq!(
        shapes,
        vec![
            ("Settings".to_string(), TableKind::Value),
            ("Rarity".to_string(), TableKind::Database),
            ("Bots".to_string(), TableKind::Database),
        ]
    );

    let TableDefinition::Value(settings) = &tables[0] else {
        panic!("expected value table");
    };
    assert_eq!(settings.items.len(), 3);
    assert_eq!(settings.items[1].array, ArrayKind::OneCell);
    assert_eq!(settings.items[1].values, vec!["Ann", "Bob", "C|D"]);
    assert_eq!(settings.items[2].values, vec!["2.5"]);
    assert_eq!(settings.items[2].height, 2);

    let rarity = tables[1].as_database().unwrap();
    assert_eq!(rarity.ids().collect::<Vec<_>>(), vec!["common", "rare"]);
    assert_eq!(rarity.bounds.end_row, 4);

    let bots = tables[2].as_database().unwrap();
    assert!(bots.has_int_ids());
    assert_eq!(bots.objects.len(), 2);
    assert_eq!(bots.root.child("Rarity").unwrap().base_type, "Rarity");
    assert_eq!(bots.root.child("Loot").unwrap().base_type, "Loot");
}

#[test]
fn parsing_is_idempotent() {
    let page = workbook_page();
    assert_eq!(parse(&page), parse(&page));
}

#[test]
fn parse_grid_accepts_raw_cells() {
    let cells = vec![
        vec![Some("id".to_string()), Some("type".into()), Some("value".into())],
        vec![Some(" speed ".to_string()), None, Some("fast".into())],
    ];
    let (tables, _) = parse_grid("Tuning", cells);
    let t = tables[0].as_value().unwrap();
    assert_eq!(t.name, "Tuning");
    assert_eq!(t.items[0].id, "Speed");
    assert_eq!(t.items[0].declared_type, "String");
}

#[test]
fn custom_end_marker() {
    let page = Page::from_rows(
        "Kinds",
        vec![vec!["const", "value"], vec!["a"], vec!["STOP"], vec!["b"]],
    );
    let parser = GridParser::new(ParseOptions {
        end_marker: "STOP".into(),
        ..Default::default()
    });
    let t = parser.parse(&page).tables.remove(0);
    assert_eq!(t.as_constant().unwrap().items.len(), 1);
}

proptest! {
    #[test]
    fn tokenizer_is_total(input in ".{0,40}", delim in prop_oneof![Just(","), Just("|"), Just("::"), Just(";")]) {
        let tokens = Tokenizer::new(delim).tokenize(&input);
        prop_assert!(tokens.len() <= input.len() + 1);
        if !input.contains(delim) && !input.contains('\\') && !input.trim().is_empty() {
            prop_assert_eq!(tokens.len(), 1);
        }
    }

    #[test]
    fn plain_tokens_round_trip(parts in prop::collection::vec("[a-z0-9]{1,6}", 1..6)) {
        let joined = parts.join(", ");
        prop_assert_eq!(Tokenizer::new(",").tokenize(&joined), parts);
    }

    #[test]
    fn random_grids_parse_deterministically(
        cells in prop::collection::vec(
            prop::collection::vec(prop_oneof![Just(""), Just("id"), Just("#T"), Just("const"), Just("value"), Just("type"), Just("1"), Just("END"), Just("!x")], 0..6),
            0..8,
        )
    ) {
        let page = Page::from_rows("P", cells);
        prop_assert_eq!(parse(&page), parse(&page));
    }
}
