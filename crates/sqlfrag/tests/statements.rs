use sqlfrag::prelude::*;
use sqlfrag::{SchemaRegistry, TableInfo};

struct Customer;

impl TableMeta for Customer {
    fn table_name() -> &'static str {
        "customers"
    }

    fn schema_name() -> Option<&'static str> {
        Some("sales")
    }

    fn columns() -> &'static [&'static str] {
        &["id", "full_name", "region"]
    }

    fn field_columns() -> &'static [(&'static str, &'static str)] {
        &[("name", "full_name")]
    }
}

struct Invoice;

fn engine() -> Dialect {
    let mut dialect = Dialect::sqlserver().with_table::<Customer>();
    dialect.schema_mut().register_table::<Invoice>(
        TableInfo::new("invoices")
            .with_columns(&["id", "customer_id"])
            .with_mapped_column("amount", "total_amount"),
    );
    dialect
}

#[test]
fn entity_report_query() {
    let c = Alias::entity_as::<Customer>("c");
    let i = Alias::entity_as::<Invoice>("i");

    let mut q = Query::new();
    q.select().add(c.field("name"));
    q.select()
        .add(Func::new("SUM").arg(i.field("amount")))
        .alias("total")
        .unwrap();
    q.from(c.clone());
    q.inner_join(i.clone())
        .on(Operator::eq(i.field("customer_id"), c.field("id")));
    q.filter(Operator::eq(c.field("region"), "EU"));
    q.group_by().add(c.field("name"));
    q.having()
        .add(Operator::gt(Func::new("SUM").arg(i.field("amount")), 1000));
    q.order_by().add(c.field("name")).asc().unwrap();
    q.fetch(10);

    let result = q.compile(&engine()).unwrap();
    assert_eq!(
        result.sql,
        "SELECT [c].[full_name], SUM([i].[total_amount]) AS [total] \
         FROM [sales].[customers] AS [c] \
         INNER JOIN [invoices] AS [i] ON [i].[customer_id] = [c].[id] \
         WHERE [c].[region] = @p0 \
         GROUP BY [c].[full_name] \
         HAVING SUM([i].[total_amount]) > @p1 \
         ORDER BY [c].[full_name] ASC \
         OFFSET 0 ROWS FETCH NEXT @p2 ROWS ONLY"
    );
    assert_eq!(result.params.len(), 3);
    assert_eq!(result.param("@p0"), Some(&Value::Text("EU".into())));
}

#[test]
fn entity_select_all_expands_columns() {
    let c = Alias::entity_as::<Customer>("c");
    let mut q = Query::new();
    q.select().add(c.all());
    q.from(c.clone());

    assert_eq!(
        q.compile(&engine()).unwrap().sql,
        "SELECT [c].[id], [c].[full_name], [c].[region] FROM [sales].[customers] AS [c]"
    );
}

#[test]
fn unmapped_entity_fails_compile() {
    struct Ghost;
    let mut q = Query::new();
    q.select().add(Alias::entity::<Ghost>().all());
    q.from(Alias::entity::<Ghost>());
    let err = q.compile(&engine()).unwrap_err();
    assert!(matches!(err, SqlError::UnknownEntity(ref name) if name == "Ghost"));
}

#[test]
fn one_tree_many_dialects() {
    let u = Alias::new("users", "u");
    let mut q = Query::new();
    q.select()
        .add(ArithOperator::concat().with(u.column("first")).with(" ").with(u.column("last")))
        .alias("full")
        .unwrap();
    q.from(u.clone());
    q.filter(Operator::new(u.column("id"), "%", 2));
    q.order_by().add(u.column("id")).desc().unwrap();
    q.offset(20).fetch(10);

    let cases = [
        (
            Dialect::postgres(),
            r#"SELECT "u"."first" || @p0 || "u"."last" AS "full" FROM "users" AS "u" WHERE "u"."id" % @p1 ORDER BY "u"."id" DESC LIMIT @p3 OFFSET @p2"#,
        ),
        (
            Dialect::sqlserver(),
            "SELECT [u].[first] + @p0 + [u].[last] AS [full] FROM [users] AS [u] WHERE [u].[id] % @p1 ORDER BY [u].[id] DESC OFFSET @p2 ROWS FETCH NEXT @p3 ROWS ONLY",
        ),
        (
            Dialect::mysql(),
            "SELECT CONCAT(CONCAT(`u`.`first`, @p0), `u`.`last`) AS `full` FROM `users` AS `u` WHERE `u`.`id` % @p1 ORDER BY `u`.`id` DESC LIMIT @p3 OFFSET @p2",
        ),
        (
            Dialect::oracle(),
            r#"SELECT "u"."first" || :p0 || "u"."last" AS "full" FROM "users" "u" WHERE MOD("u"."id", :p1) ORDER BY "u"."id" DESC OFFSET :p2 ROWS FETCH NEXT :p3 ROWS ONLY"#,
        ),
    ];

    for (engine, expected) in cases {
        let result = q.compile(&engine).unwrap();
        assert_eq!(result.sql, expected, "dialect {}", engine.name());
        assert_eq!(result.params.len(), 4);
    }
}

#[test]
fn multi_row_insert_per_dialect() {
    let mut q = Query::new();
    q.insert_into("tags").column("name");
    for tag in ["a", "b", "c"] {
        q.values(ValList::new().with(tag)).unwrap();
    }

    assert_eq!(
        q.compile(&Dialect::sqlite()).unwrap().sql,
        r#"INSERT INTO "tags" ("name") VALUES (@p0), (@p1), (@p2)"#
    );
    assert_eq!(
        q.compile(&Dialect::oracle()).unwrap().sql,
        r#"INSERT INTO "tags" ("name") SELECT :p0 FROM DUAL UNION ALL SELECT :p1 FROM DUAL UNION ALL SELECT :p2 FROM DUAL"#
    );
}

#[test]
fn recursive_cte_query() {
    let mut anchor = Query::new();
    anchor.select().add(Column::new("id")).add(Column::new("parent_id"));
    anchor.from(Alias::table("nodes"));
    anchor.filter(RightOperator::is_null(Column::new("parent_id")));

    let n = Alias::new("nodes", "n");
    let mut step = Query::new();
    step.select().add(n.column("id")).add(n.column("parent_id"));
    step.from(n.clone());

    let mut tree = Cte::new("tree");
    step.inner_join(tree.alias().clone())
        .on(Operator::eq(n.column("parent_id"), tree.col("id")));
    tree.recursive()
        .column("id")
        .column("parent_id")
        .query(SetOperator::union_all(anchor, step));

    let mut q = Query::new();
    q.with().add(tree.clone());
    q.select().add(Func::count_all());
    q.from(tree);

    assert_eq!(
        q.compile(&Dialect::postgres()).unwrap().sql,
        r#"WITH RECURSIVE "tree" ("id", "parent_id") AS (SELECT "id", "parent_id" FROM "nodes" WHERE "parent_id" IS NULL UNION ALL SELECT "n"."id", "n"."parent_id" FROM "nodes" AS "n" INNER JOIN "tree" ON "n"."parent_id" = "tree"."id") SELECT COUNT(*) FROM "tree""#
    );
}

#[test]
fn registry_is_shared_per_dialect() {
    let mut registry = SchemaRegistry::new();
    registry.register::<Customer>();
    assert_eq!(registry.len(), 1);

    let engine = engine();
    assert_eq!(engine.schema().len(), 2);
}
