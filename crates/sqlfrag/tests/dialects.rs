use sqlfrag::prelude::*;
use sqlfrag::{EntityType, FunctionInfo, NameQuote, OffsetStyle, OperatorInfo, TableInfo};

const WAREHOUSE: &str = r#"
base = "postgres"
name = "warehouse"

[options]
functions_registered_only = true
parameter_prefix = "$"

[operators]
"||" = { function = "CONCAT" }

[functions]
IFNULL = "COALESCE"
LOWER = "LOWER"
"#;

#[test]
fn toml_dialect_overrides_preset() {
    let engine = Dialect::from_toml_str(WAREHOUSE).unwrap();
    assert_eq!(engine.name(), "warehouse");
    assert_eq!(engine.options().offset_style, OffsetStyle::Limit);
    assert!(engine.options().distinct_on_supported);

    let mut q = Query::new();
    q.select()
        .add(Func::new("IFNULL").arg(Column::new("nick")).arg(Column::new("name")))
        .add(ArithOperator::concat().with(Column::new("a")).with(Column::new("b")));
    q.from(Alias::table("people"));
    q.filter(Operator::eq(Func::new("lower").arg(Column::new("name")), "ann"));
    q.fetch(5);

    let result = q.compile(&engine).unwrap();
    assert_eq!(
        result.sql,
        r#"SELECT COALESCE("nick", "name"), CONCAT("a", "b") FROM "people" WHERE LOWER("name") = $0 LIMIT $1"#
    );
    assert_eq!(result.param("$0"), Some(&Value::Text("ann".into())));
}

#[test]
fn toml_dialect_rejects_unregistered_functions() {
    let engine = Dialect::from_toml_str(WAREHOUSE).unwrap();
    let mut q = Query::new();
    q.select().add(Func::new("NOW"));
    assert!(matches!(
        q.compile(&engine).unwrap_err(),
        SqlError::InvalidConfiguration(_)
    ));
}

#[test]
fn toml_dialect_errors() {
    let unknown_key = Dialect::from_toml_str("bsae = \"postgres\"").unwrap_err();
    assert!(matches!(unknown_key, SqlError::Config(_)));

    let bad_base = Dialect::from_toml_str("base = \"db2\"").unwrap_err();
    assert!(matches!(bad_base, SqlError::Config(_)));

    let bad_option = Dialect::from_toml_str("[options]\nname_quote = \"curly\"").unwrap_err();
    assert!(matches!(bad_option, SqlError::Config(_)));

    let misspelled_option =
        Dialect::from_toml_str("base = \"postgres\"\n[options]\ntop_suported = true").unwrap_err();
    assert!(matches!(misspelled_option, SqlError::Config(_)));
}

#[test]
fn generic_dialect_without_base() {
    let engine = Dialect::from_toml_str("name = \"plain\"").unwrap();
    let mut q = Query::new();
    q.select().add(Column::new("a"));
    q.from(Alias::table("t"));
    q.offset(1);
    assert_eq!(
        q.compile(&engine).unwrap().sql,
        r#"SELECT "a" FROM "t" OFFSET @p0 ROWS"#
    );
}

#[test]
fn presets_disagree_where_expected() {
    let top = {
        let mut q = Query::new();
        q.select().top(3).add(Column::all());
        q.from(Alias::table("t"));
        q
    };
    assert_eq!(
        top.compile(&Dialect::sqlserver()).unwrap().sql,
        "SELECT TOP (@p0) * FROM [t]"
    );
    for engine in [Dialect::postgres(), Dialect::mysql(), Dialect::sqlite(), Dialect::oracle()] {
        let err = top.compile(&engine).unwrap_err();
        assert!(
            matches!(err, SqlError::ClauseNotSupported { clause: "TOP", .. }),
            "{} accepted TOP",
            engine.name()
        );
    }

    let mut full = Query::new();
    full.select().add(Column::all());
    full.from(Alias::table("a"));
    full.join(JoinKind::Full, Alias::table("b"))
        .on(Operator::eq(Column::new("a.id"), Column::new("b.id")));
    assert_eq!(
        full.compile(&Dialect::postgres()).unwrap().sql,
        r#"SELECT * FROM "a" FULL JOIN "b" ON "a"."id" = "b"."id""#
    );
    assert!(full.compile(&Dialect::mysql()).unwrap_err().is_not_supported());
}

/// An engine backed by fixed tables, written without the `Dialect` type.
struct Fixed {
    options: EngineOptions,
    orders: TableInfo,
    upper: FunctionInfo,
    modulo: OperatorInfo,
}

struct Order;

impl Fixed {
    fn new() -> Self {
        Self {
            options: EngineOptions {
                name_quote: NameQuote::Backtick,
                table_as: false,
                ..EngineOptions::default()
            },
            orders: TableInfo::new("order_rows").with_columns(&["id", "qty"]),
            upper: FunctionInfo::renamed("UCASE"),
            modulo: OperatorInfo::Function("MOD".into()),
        }
    }
}

impl Engine for Fixed {
    fn name(&self) -> &str {
        "fixed"
    }

    fn options(&self) -> &EngineOptions {
        &self.options
    }

    fn operator(&self, symbol: &str) -> Option<&OperatorInfo> {
        (symbol == "%").then_some(&self.modulo)
    }

    fn function(&self, name: &str) -> Option<&FunctionInfo> {
        name.eq_ignore_ascii_case("UPPER").then_some(&self.upper)
    }

    fn table_info(&self, entity: EntityType) -> SqlResult<&TableInfo> {
        if entity == EntityType::of::<Order>() {
            Ok(&self.orders)
        } else {
            Err(SqlError::UnknownEntity(entity.short_name().to_string()))
        }
    }
}

#[test]
fn custom_engine_implementation() {
    let o = Alias::entity_as::<Order>("o");
    let mut q = Query::new();
    q.select().add(o.all()).add(Func::new("upper").arg(o.field("qty")));
    q.from(o.clone());
    q.filter(Operator::new(o.field("qty"), "%", 2));

    let result = q.compile(&Fixed::new()).unwrap();
    assert_eq!(
        result.sql,
        "SELECT `o`.`id`, `o`.`qty`, UCASE(`o`.`qty`) FROM `order_rows` `o` WHERE MOD(`o`.`qty`, @p0)"
    );
}
