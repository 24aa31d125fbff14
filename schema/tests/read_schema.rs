use rollabi_schema::{
    read_schema, Category, EmptySchemaAction, Error, ResolvedType, SemanticError,
};

const WALLET: &str = r#"
structs:
  - name: Coin
    fields:
      - {name: denom, type: string}
      - {name: amount, type: uint}
advances:
  - name: deposit
    fields:
      - coins: Coin[]
      - {name: memo, type: bytes}
inspects:
  - name: balance
    fields:
      - owner: address
"#;

#[test]
fn reads_a_complete_schema() {
    let schema = read_schema(WALLET.as_bytes(), EmptySchemaAction::Deny).unwrap();
    assert_eq!(schema.message_count(), 2);

    let categories: Vec<_> = schema
        .messages()
        .map(|(category, message)| (category, message.name.as_str()))
        .collect();
    assert_eq!(
        categories,
        [(Category::Advance, "deposit"), (Category::Inspect, "balance")]
    );

    let deposit = &schema.advances[0];
    assert_eq!(
        deposit.fields[0].ty(),
        &ResolvedType::Array(Box::new(ResolvedType::StructRef { index: 0 }))
    );
    assert_eq!(deposit.fields[1].ty(), &ResolvedType::Bytes);
    assert_eq!(
        schema.struct_at(0).fields[1].ty(),
        &ResolvedType::Int {
            signed: false,
            bits: 256
        }
    );
}

#[test]
fn parse_and_semantic_errors_are_distinguished() {
    let err = read_schema(b"advances:\n  - name: 9lives\n", EmptySchemaAction::Deny).unwrap_err();
    assert!(matches!(err, Error::Parse(_)), "{err}");
    assert_eq!(err.to_string(), "advance name: invalid first rune '9' in \"9lives\"");

    let err = read_schema(
        b"inspects:\n  - name: peek\n    fields:\n      - what: Missing\n",
        EmptySchemaAction::Deny,
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "inspect peek: field what: type not found: Missing"
    );
}

#[test]
fn empty_documents_follow_the_policy() {
    for document in ["", "# nothing here\n", "~"] {
        let err = read_schema(document.as_bytes(), EmptySchemaAction::Deny).unwrap_err();
        assert!(matches!(err, Error::Semantic(SemanticError::NoMessages)));
        let schema = read_schema(document.as_bytes(), EmptySchemaAction::Allow).unwrap();
        assert!(schema.is_empty());
    }
}
