use super::*;
use crate::engine::Dialect;
use crate::fragments::{
    Column, Cte, LeftQueryOperator, Operator, QueryOperator, SetOperator,
};
use crate::value::Value;

fn users_by_id() -> Query {
    let mut q = Query::new();
    q.select().add(Column::new("name"));
    q.from(Alias::table("users"));
    q.filter(Operator::eq(Column::new("id"), 7));
    q
}

fn orders_over(total: i64) -> Query {
    let mut q = Query::new();
    q.select().add(Column::new("user_id"));
    q.from(Alias::table("orders"));
    q.filter(Operator::gt(Column::new("total"), total));
    q
}

// ==================== SELECT ====================

#[test]
fn empty_query_fails() {
    let err = Query::new().compile(&Dialect::postgres()).unwrap_err();
    assert!(err.is_empty_query());

    let mut q = Query::new();
    q.from(Alias::table("users"));
    q.filter(Operator::eq(Column::new("id"), 1));
    assert!(q.compile(&Dialect::postgres()).unwrap_err().is_empty_query());
}

#[test]
fn select_from_where() {
    let q = users_by_id();
    let result = q.compile(&Dialect::postgres()).unwrap();
    assert_eq!(result.sql, r#"SELECT "name" FROM "users" WHERE "id" = @p0"#);
    assert_eq!(result.param("@p0"), Some(&Value::Int(7)));

    let result = q.compile(&Dialect::sqlserver()).unwrap();
    assert_eq!(result.sql, "SELECT [name] FROM [users] WHERE [id] = @p0");
}

#[test]
fn parameters_follow_compile_order() {
    let mut q = Query::new();
    q.select().add(Column::all());
    q.from(Alias::table("t"));
    q.filter(Operator::eq(Column::new("a"), 1))
        .filter(Operator::eq(Column::new("b"), 2));
    let result = q.compile(&Dialect::postgres()).unwrap();
    assert_eq!(
        result.sql,
        r#"SELECT * FROM "t" WHERE "a" = @p0 AND "b" = @p1"#
    );
    assert_eq!(result.params.names(), vec!["@p0", "@p1"]);
    assert_eq!(
        result.params.values(),
        vec![&Value::Int(1), &Value::Int(2)]
    );
}

#[test]
fn oracle_parameters_use_colon_prefix() {
    let result = users_by_id().compile(&Dialect::oracle()).unwrap();
    assert_eq!(result.sql, r#"SELECT "name" FROM "users" WHERE "id" = :p0"#);
    assert_eq!(result.param(":p0"), Some(&Value::Int(7)));
}

#[test]
fn pagination_follows_dialect() {
    let mut q = Query::new();
    q.select().add(Column::all());
    q.from(Alias::table("users"));
    q.order_by().add(Column::new("id"));
    q.offset(10).fetch(20);

    let mssql = q.compile(&Dialect::sqlserver()).unwrap();
    assert_eq!(
        mssql.sql,
        "SELECT * FROM [users] ORDER BY [id] OFFSET @p0 ROWS FETCH NEXT @p1 ROWS ONLY"
    );

    let pg = q.compile(&Dialect::postgres()).unwrap();
    assert_eq!(
        pg.sql,
        r#"SELECT * FROM "users" ORDER BY "id" LIMIT @p1 OFFSET @p0"#
    );
    assert_eq!(mssql.params, pg.params);
    assert_eq!(pg.param("@p0"), Some(&Value::Int(10)));
    assert_eq!(pg.param("@p1"), Some(&Value::Int(20)));
}

#[test]
fn select_without_from_uses_dummy_table() {
    let mut q = Query::new();
    q.select().add(RawSql::new("1"));
    assert_eq!(q.compile(&Dialect::oracle()).unwrap().sql, "SELECT 1 FROM DUAL");
    assert_eq!(q.compile(&Dialect::postgres()).unwrap().sql, "SELECT 1");
}

#[test]
fn join_without_from_fails() {
    let mut q = Query::new();
    q.select().add(Column::all());
    q.inner_join(Alias::table("orders"));
    assert!(matches!(
        q.compile(&Dialect::postgres()).unwrap_err(),
        SqlError::InvalidOperation(_)
    ));
}

#[test]
fn joins_follow_from() {
    let u = Alias::new("users", "u");
    let o = Alias::new("orders", "o");
    let mut q = Query::new();
    q.select().add(u.column("name")).add(o.column("total"));
    q.from(u.clone());
    q.left_join(o.clone())
        .on(Operator::eq(o.column("user_id"), u.column("id")));
    assert_eq!(
        q.compile(&Dialect::mysql()).unwrap().sql,
        "SELECT `u`.`name`, `o`.`total` FROM `users` AS `u` \
         LEFT JOIN `orders` AS `o` ON `o`.`user_id` = `u`.`id`"
    );
}

#[test]
fn group_by_and_having() {
    let mut q = Query::new();
    q.select().add(Column::new("dept")).add(Func::count_all());
    q.from(Alias::table("emp"));
    q.group_by().add(Column::new("dept"));
    q.having().add(Operator::gt(Func::count_all(), 5));
    assert_eq!(
        q.compile(&Dialect::postgres()).unwrap().sql,
        r#"SELECT "dept", COUNT(*) FROM "emp" GROUP BY "dept" HAVING COUNT(*) > @p0"#
    );
}

#[test]
fn empty_group_by_fails() {
    let mut q = users_by_id();
    q.group_by();
    assert!(q.compile(&Dialect::postgres()).unwrap_err().is_empty_list());
}

#[test]
fn before_and_after_are_raw() {
    let mut q = Query::new();
    q.select().add(Column::new("a"));
    q.from(Alias::table("t"));
    q.before(RawSql::new("SET NOCOUNT ON;"))
        .after(RawSql::new("OPTION (RECOMPILE)"));
    assert_eq!(
        q.compile(&Dialect::sqlserver()).unwrap().sql,
        "SET NOCOUNT ON; SELECT [a] FROM [t] OPTION (RECOMPILE)"
    );
}

#[test]
fn count_drops_paging() {
    let mut q = Query::new();
    q.select().add(Column::all());
    q.from(Alias::table("users"));
    q.filter(Operator::eq(Column::new("active"), true));
    q.order_by().add(Column::new("id"));
    q.fetch(10);
    q.count();
    assert_eq!(
        q.compile(&Dialect::postgres()).unwrap().sql,
        r#"SELECT COUNT(*) FROM "users" WHERE "active" = @p0"#
    );
}

// ==================== Sub-queries ====================

#[test]
fn cte_body_is_written_once() {
    let mut cte = Cte::new("recent");
    cte.query(orders_over(100));

    let mut q = Query::new();
    q.with().add(cte.clone());
    q.select().add(Column::all());
    q.from(cte.clone());
    q.filter(Operator::eq(cte.col("user_id"), 3));

    let result = q.compile(&Dialect::postgres()).unwrap();
    assert_eq!(
        result.sql,
        r#"WITH "recent" AS (SELECT "user_id" FROM "orders" WHERE "total" > @p0) SELECT * FROM "recent" WHERE "recent"."user_id" = @p1"#
    );
    assert_eq!(result.sql.matches(r#"SELECT "user_id""#).count(), 1);
}

#[test]
fn sub_query_parameters_are_numbered_in_place() {
    let mut q = Query::new();
    q.select().add(Column::new("name"));
    q.from(Alias::table("users"));
    q.filter(Operator::eq(Column::new("active"), true))
        .filter(QueryOperator::in_query(Column::new("id"), orders_over(100)));

    let result = q.compile(&Dialect::postgres()).unwrap();
    assert_eq!(
        result.sql,
        r#"SELECT "name" FROM "users" WHERE "active" = @p0 AND "id" IN (SELECT "user_id" FROM "orders" WHERE "total" > @p1)"#
    );
    assert_eq!(result.param("@p0"), Some(&Value::Bool(true)));
    assert_eq!(result.param("@p1"), Some(&Value::Int(100)));
}

#[test]
fn exists_wraps_query() {
    let mut q = Query::new();
    q.select().add(Column::all());
    q.from(Alias::table("users"));
    q.filter(LeftQueryOperator::exists(orders_over(0)));
    assert_eq!(
        q.compile(&Dialect::postgres()).unwrap().sql,
        r#"SELECT * FROM "users" WHERE EXISTS (SELECT "user_id" FROM "orders" WHERE "total" > @p0)"#
    );
}

#[test]
fn queries_combine_with_set_operators() {
    let mut first = Query::new();
    first.select().add(Column::new("a"));
    first.from(Alias::table("t1"));
    let mut second = Query::new();
    second.select().add(Column::new("a"));
    second.from(Alias::table("t2"));

    let mut union = SetOperator::union_all(first, second);
    union.order_by().add(Column::new("a"));
    assert_eq!(
        compile_fragment(&union, &Dialect::postgres()).unwrap().sql,
        r#"SELECT "a" FROM "t1" UNION ALL SELECT "a" FROM "t2" ORDER BY "a""#
    );
}

fn ids_from(table: &str) -> Query {
    let mut q = Query::new();
    q.select().add(Column::new("id"));
    q.from(Alias::table(table));
    q
}

#[test]
fn nested_set_operators_keep_their_grouping() {
    let mut inner = SetOperator::union(ids_from("b"), ids_from("c"));
    inner.order_by().add(Column::new("id"));
    let outer = SetOperator::union(ids_from("a"), inner);
    assert_eq!(
        compile_fragment(&outer, &Dialect::postgres()).unwrap().sql,
        r#"SELECT "id" FROM "a" UNION (SELECT "id" FROM "b" UNION SELECT "id" FROM "c" ORDER BY "id")"#
    );

    let intersect = SetOperator::intersect(
        SetOperator::union(ids_from("a"), ids_from("b")),
        ids_from("c"),
    );
    assert_eq!(
        compile_fragment(&intersect, &Dialect::postgres()).unwrap().sql,
        r#"(SELECT "id" FROM "a" UNION SELECT "id" FROM "b") INTERSECT SELECT "id" FROM "c""#
    );
    assert_eq!(
        intersect.to_string(),
        "(SELECT id FROM a UNION SELECT id FROM b) INTERSECT SELECT id FROM c"
    );
}

#[test]
fn paged_query_operand_is_parenthesized() {
    let mut first = ids_from("a");
    first.order_by().add(Column::new("id")).desc().unwrap();
    first.fetch(5);
    let union = SetOperator::union_all(first, ids_from("b"));
    assert_eq!(
        compile_fragment(&union, &Dialect::postgres()).unwrap().sql,
        r#"(SELECT "id" FROM "a" ORDER BY "id" DESC LIMIT @p0) UNION ALL SELECT "id" FROM "b""#
    );
}

#[test]
fn sub_query_as_from_source() {
    let mut q = Query::new();
    q.select().add(Column::all());
    q.from(orders_over(5)).alias("big");
    assert_eq!(
        q.compile(&Dialect::postgres()).unwrap().sql,
        r#"SELECT * FROM (SELECT "user_id" FROM "orders" WHERE "total" > @p0) AS "big""#
    );
}

// ==================== Statement kinds ====================

#[test]
fn statement_kinds_replace_each_other() {
    let mut q = users_by_id();
    assert_eq!(q.statement().kind(), Some("SELECT"));

    q.update().set("name", "bob");
    assert_eq!(q.statement().kind(), Some("UPDATE"));
    let result = q.compile(&Dialect::postgres()).unwrap();
    assert_eq!(
        result.sql,
        r#"UPDATE "users" SET "name" = @p0 WHERE "id" = @p1"#
    );
    assert!(!result.sql.contains("SELECT"));

    q.delete();
    assert_eq!(q.statement().kind(), Some("DELETE"));
    let result = q.compile(&Dialect::postgres()).unwrap();
    assert_eq!(result.sql, r#"DELETE FROM "users" WHERE "id" = @p0"#);
    assert!(!result.sql.contains("SET"));

    q.select().add(Column::new("email"));
    assert_eq!(
        q.compile(&Dialect::postgres()).unwrap().sql,
        r#"SELECT "email" FROM "users" WHERE "id" = @p0"#
    );

    q.clear_statement();
    assert!(q.compile(&Dialect::postgres()).unwrap_err().is_empty_query());
}

#[test]
fn reused_query_on_sqlserver() {
    let mut q = users_by_id();
    q.update().set("name", "bob");
    assert_eq!(
        q.compile(&Dialect::sqlserver()).unwrap().sql,
        "UPDATE [users] SET [name] = @p0 FROM [users] WHERE [id] = @p1"
    );

    q.delete();
    assert_eq!(
        q.compile(&Dialect::sqlserver()).unwrap().sql,
        "DELETE [users] FROM [users] WHERE [id] = @p0"
    );
}

#[test]
fn update_with_join_layouts() {
    let u = Alias::new("users", "u");
    let o = Alias::new("orders", "o");
    let mut q = Query::new();
    q.update().set(u.column("total"), 0);
    q.from(u.clone());
    q.inner_join(o.clone())
        .on(Operator::eq(o.column("user_id"), u.column("id")));

    assert_eq!(
        q.compile(&Dialect::mysql()).unwrap().sql,
        "UPDATE `users` AS `u` INNER JOIN `orders` AS `o` ON `o`.`user_id` = `u`.`id` \
         SET `u`.`total` = @p0"
    );
    assert_eq!(
        q.compile(&Dialect::sqlserver()).unwrap().sql,
        "UPDATE [u] SET [u].[total] = @p0 FROM [users] AS [u] \
         INNER JOIN [orders] AS [o] ON [o].[user_id] = [u].[id]"
    );
}

#[test]
fn update_aliased_target_without_from() {
    let u = Alias::new("users", "u");
    let mut q = Query::new();
    q.update().table(u.clone()).set(u.column("name"), "x");
    q.filter(Operator::eq(u.column("id"), 1));
    assert_eq!(
        q.compile(&Dialect::sqlserver()).unwrap().sql,
        "UPDATE [u] SET [u].[name] = @p0 FROM [users] AS [u] WHERE [u].[id] = @p1"
    );
    assert_eq!(
        q.compile(&Dialect::postgres()).unwrap().sql,
        r#"UPDATE "users" AS "u" SET "name" = @p0 WHERE "u"."id" = @p1"#
    );
}

#[test]
fn update_needs_a_target() {
    let mut q = Query::new();
    q.update().set("name", 1);
    assert!(matches!(
        q.compile(&Dialect::postgres()).unwrap_err(),
        SqlError::InvalidOperation(_)
    ));

    let mut empty_set = Query::new();
    empty_set.update().table("users");
    assert!(empty_set.compile(&Dialect::postgres()).unwrap_err().is_empty_list());
}

#[test]
fn delete_needs_from() {
    let mut q = Query::new();
    q.delete();
    assert!(matches!(
        q.compile(&Dialect::postgres()).unwrap_err(),
        SqlError::InvalidOperation(_)
    ));
}

#[test]
fn delete_with_alias_targets_from_source() {
    let u = Alias::new("users", "u");
    let mut q = Query::new();
    q.delete();
    q.from(u.clone());
    q.filter(Operator::eq(u.column("id"), 1));
    assert_eq!(
        q.compile(&Dialect::sqlserver()).unwrap().sql,
        "DELETE [u] FROM [users] AS [u] WHERE [u].[id] = @p0"
    );
    assert_eq!(
        q.compile(&Dialect::postgres()).unwrap().sql,
        r#"DELETE FROM "users" AS "u" WHERE "u"."id" = @p0"#
    );

    q.delete().top(5);
    assert_eq!(
        q.compile(&Dialect::sqlserver()).unwrap().sql,
        "DELETE TOP (@p0) [u] FROM [users] AS [u] WHERE [u].[id] = @p1"
    );
}

#[test]
fn delete_of_unnamed_sub_query_fails() {
    let mut q = Query::new();
    q.delete();
    q.from(orders_over(1));
    assert!(matches!(
        q.compile(&Dialect::sqlserver()).unwrap_err(),
        SqlError::InvalidOperation(_)
    ));
}

#[test]
fn insert_rows() {
    let mut q = Query::new();
    q.insert_into("users").column("id").column("name");
    q.values(ValList::new().with(1).with("a")).unwrap();
    q.values(ValList::new().with(2).with("b")).unwrap();
    let result = q.compile(&Dialect::postgres()).unwrap();
    assert_eq!(
        result.sql,
        r#"INSERT INTO "users" ("id", "name") VALUES (@p0, @p1), (@p2, @p3)"#
    );
    assert_eq!(result.params.len(), 4);
}

#[test]
fn insert_from_select() {
    let mut q = Query::new();
    q.insert_into("archive").column("user_id").from_query(orders_over(10));
    assert_eq!(
        q.compile(&Dialect::postgres()).unwrap().sql,
        r#"INSERT INTO "archive" ("user_id") SELECT "user_id" FROM "orders" WHERE "total" > @p0"#
    );
}

#[test]
fn values_require_insert() {
    let mut q = users_by_id();
    assert!(matches!(
        q.values(ValList::new().with(1)).unwrap_err(),
        SqlError::InvalidOperation(_)
    ));
}

// ==================== Rendering ====================

#[test]
fn display_renders_literals() {
    let u = Alias::new("users", "u");
    let mut q = Query::new();
    q.select().add(u.column("id"));
    q.from(u.clone());
    q.filter(Operator::eq(u.column("id"), 5));
    assert_eq!(q.to_string(), "SELECT u.id FROM users AS u WHERE u.id = 5");
}

#[test]
fn compile_is_repeatable_across_threads() {
    let mut q = users_by_id();
    q.order_by().add(Column::new("name"));
    q.offset(0).fetch(10);
    let engine = Dialect::postgres();
    let expected = q.compile(&engine).unwrap();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| s.spawn(|| q.compile(&engine).unwrap())).collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[cfg(feature = "tracing")]
#[test]
fn traced_engine_compiles_the_same() {
    use crate::trace::CompileTrace;

    let plain = users_by_id().compile(&Dialect::postgres()).unwrap();
    let traced = Dialect::postgres().with_trace(CompileTrace::new().sql_limit(None).show_params());
    assert_eq!(users_by_id().compile(&traced).unwrap(), plain);
    assert!(Query::new().compile(&traced).is_err());
}
