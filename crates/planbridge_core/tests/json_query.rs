use std::sync::Arc;

use planbridge_core::binder::Binder;
use planbridge_core::config::PlannerConfig;
use planbridge_core::datatype::{DataType, SqlType, StringTypeMeta, TypeFamily};
use planbridge_core::errors::{PlanError, Result};
use planbridge_core::expr::{Call, Expr, Operand};
use planbridge_core::functions::SqlOperator;
use planbridge_core::functions::behavior::{
    BehaviorTag, JsonQueryEmptyOrErrorBehavior, JsonQueryWrapperBehavior, SymbolTag,
};
use planbridge_core::functions::checker::{OperandType, TypeCheck};
use planbridge_core::functions::json_query::{
    self, DEFAULT_RETURN_TYPE, JsonQuery, ON_EMPTY, ON_ERROR, WRAPPER,
};
use planbridge_core::functions::operator_table::OperatorTable;
use planbridge_core::planner::Planner;
use planbridge_core::unparse::expr_to_sql;
use planbridge_core::validate::{Validated, validate_expr};
use planbridge_parser::{Location, parse_expr};

fn bind(sql: &str) -> Result<Expr> {
    let operators = OperatorTable::builtin();
    Binder::new(&operators).bind_expr(&parse_expr(sql)?)
}

fn bind_call(sql: &str) -> Call {
    match bind(sql).unwrap() {
        Expr::Call(call) => *call,
        other => panic!("not a call: {other}"),
    }
}

#[test]
fn concrete_scenario() {
    logutil::init_test();

    let sql = "JSON_QUERY(doc, '$.a' WITHOUT ARRAY WRAPPER NULL ON EMPTY NULL ON ERROR)";
    let call = bind_call(sql);

    assert_eq!("JSON_QUERY", call.operator().name());
    assert_eq!(5, call.operands().len());
    assert_eq!(Some(&Operand::Expr(Expr::column("doc"))), call.operand(0));
    assert_eq!(Some(&Operand::Expr(Expr::literal("$.a"))), call.operand(1));
    assert_eq!(
        Some(JsonQueryWrapperBehavior::WithoutArray.into_tag()),
        call.operand(WRAPPER).and_then(Operand::as_symbol)
    );

    let rendered = expr_to_sql(&Expr::from(call.clone()), false).unwrap();
    assert_eq!(sql, rendered);

    let types: Vec<_> = call
        .operands()
        .iter()
        .map(|op| match op {
            Operand::Expr(_) => OperandType::Resolved(SqlType::nullable(DataType::Utf8(
                StringTypeMeta::UNBOUNDED,
            ))),
            _ => OperandType::Symbol,
        })
        .collect();
    assert_eq!(
        Some(DEFAULT_RETURN_TYPE.with_nullable(true)),
        call.operator().derive_return_type(&call, &types)
    );
}

#[test]
fn omitted_behaviors_get_defaults() {
    let short = bind_call("JSON_QUERY(doc, '$.a')");
    let long =
        bind_call("JSON_QUERY(doc, '$.a' WITHOUT ARRAY WRAPPER NULL ON EMPTY NULL ON ERROR)");
    assert_eq!(long, short);

    // Only ON ERROR given.
    let partial = bind_call("JSON_QUERY(doc, '$.a' ERROR ON ERROR)");
    assert_eq!(
        Some(JsonQueryWrapperBehavior::WithoutArray.into_tag()),
        partial.operand(WRAPPER).and_then(Operand::as_symbol)
    );
    assert_eq!(
        Some(JsonQueryEmptyOrErrorBehavior::Null.into_tag()),
        partial.operand(ON_EMPTY).and_then(Operand::as_symbol)
    );
    assert_eq!(
        Some(JsonQueryEmptyOrErrorBehavior::Error.into_tag()),
        partial.operand(ON_ERROR).and_then(Operand::as_symbol)
    );
}

#[test]
fn create_call_is_idempotent_on_complete_operands() {
    let call = bind_call(
        "JSON_QUERY(doc, '$' WITH CONDITIONAL ARRAY WRAPPER EMPTY OBJECT ON EMPTY ERROR ON ERROR)",
    );
    let operands = call.operands().iter().cloned().map(Some).collect();
    let again = JsonQuery::instance()
        .create_call(None, Location::new(4, 2), operands)
        .unwrap();
    assert_eq!(call, again);
    assert_eq!(Location::new(4, 2), again.pos());
}

#[test]
fn create_call_arity_errors() {
    let op = JsonQuery::instance();

    let err = op
        .create_call(None, Location::START, vec![Some(Expr::column("doc").into())])
        .unwrap_err();
    assert!(matches!(err, PlanError::InvalidArity { got: 1, .. }), "{err}");
    assert_eq!(
        "Invalid number of operands for JSON_QUERY: got 1, expected 5 or 6 at line 1, column 1",
        err.to_string()
    );

    let mut too_many: Vec<Option<Operand>> = vec![
        Some(Expr::column("doc").into()),
        Some(Expr::literal("$").into()),
    ];
    too_many.extend([None, None, None]);
    too_many.push(Some(Operand::TypeSpec(DataType::Int32)));
    too_many.push(Some(Expr::literal(1).into()));
    assert!(matches!(
        op.create_call(None, Location::START, too_many),
        Err(PlanError::InvalidArity { .. })
    ));

    let err = bind("JSON_QUERY(doc)").unwrap_err();
    assert!(matches!(err, PlanError::Parse(_)), "{err}");

    let err = bind("\"JSON_QUERY\"(doc)").unwrap_err();
    assert!(matches!(err, PlanError::InvalidArity { .. }), "{err}");
}

#[test]
fn round_trip_every_tag_combination() {
    let returning = [None, Some("VARCHAR(20)"), Some("INTEGER"), Some("DECIMAL(10, 2)")];

    for wrapper in JsonQueryWrapperBehavior::ALL {
        for on_empty in JsonQueryEmptyOrErrorBehavior::ALL {
            for on_error in JsonQueryEmptyOrErrorBehavior::ALL {
                for ret in returning {
                    let returning_clause = match ret {
                        Some(t) => format!(" RETURNING {t}"),
                        None => String::new(),
                    };
                    let sql = format!(
                        "JSON_QUERY(t.doc, '$.a[''b'']'{returning_clause} {} WRAPPER {} ON EMPTY {} ON ERROR)",
                        wrapper.keywords().join(" "),
                        on_empty.keywords().join(" "),
                        on_error.keywords().join(" "),
                    );

                    let expr = bind(&sql).unwrap();
                    let rendered = expr_to_sql(&expr, false).unwrap();
                    assert_eq!(sql, rendered);

                    let reparsed = bind(&rendered).unwrap();
                    assert_eq!(expr, reparsed, "{sql}");

                    let lower = expr_to_sql(&expr, true).unwrap();
                    assert_eq!(expr, bind(&lower).unwrap(), "{lower}");
                }
            }
        }
    }
}

#[test]
fn nested_calls_round_trip() {
    let sql = "JSON_QUERY(JSON_QUERY(\"Doc\", '$' WITH UNCONDITIONAL ARRAY WRAPPER EMPTY ARRAY ON EMPTY EMPTY OBJECT ON ERROR), '$[0]' WITHOUT ARRAY WRAPPER ERROR ON EMPTY NULL ON ERROR)";
    let expr = bind(sql).unwrap();
    assert_eq!(sql, expr_to_sql(&expr, false).unwrap());
}

#[test]
fn tags_cover_every_syntactic_choice() {
    let wrappers: Vec<_> = JsonQueryWrapperBehavior::ALL
        .iter()
        .map(|t| t.keywords().join(" "))
        .collect();
    assert_eq!(
        vec!["WITHOUT ARRAY", "WITH CONDITIONAL ARRAY", "WITH UNCONDITIONAL ARRAY"],
        wrappers
    );

    let behaviors: Vec<_> = JsonQueryEmptyOrErrorBehavior::ALL
        .iter()
        .map(|t| t.keywords().join(" "))
        .collect();
    assert_eq!(vec!["NULL", "ERROR", "EMPTY ARRAY", "EMPTY OBJECT"], behaviors);

    for tag in JsonQueryWrapperBehavior::ALL {
        let erased: BehaviorTag = tag.into_tag();
        assert_eq!(Some(*tag), JsonQueryWrapperBehavior::from_tag(erased));
        assert_eq!(None, JsonQueryEmptyOrErrorBehavior::from_tag(erased));
        assert_eq!("wrapper", erased.axis());
    }
}

#[test]
fn plain_with_array_is_unconditional() {
    let call = bind_call("JSON_QUERY(doc, '$' WITH ARRAY WRAPPER)");
    assert_eq!(
        Some(JsonQueryWrapperBehavior::WithUnconditionalArray.into_tag()),
        call.operand(WRAPPER).and_then(Operand::as_symbol)
    );
}

#[test]
fn checker_arity_matrix() {
    let checker = JsonQuery::instance().operand_type_checker();
    let any = OperandType::Unresolved;
    let text = OperandType::Resolved(SqlType::not_null(DataType::Utf8(StringTypeMeta::UNBOUNDED)));
    let int = OperandType::Resolved(SqlType::not_null(DataType::Int64));
    let null = OperandType::Resolved(SqlType::nullable(DataType::Null));
    let sym = OperandType::Symbol;

    for count in 0..=8 {
        assert_eq!(count == 5 || count == 6, checker.accepts_count(count), "{count}");
    }
    assert_eq!(vec![5, 6], checker.accepted_counts());

    assert_eq!(TypeCheck::Pass, checker.check(&[text, text, sym, sym, sym]));
    assert_eq!(TypeCheck::Pass, checker.check(&[int, null, sym, sym, sym, sym]));
    assert_eq!(TypeCheck::Deferred, checker.check(&[any, any, sym, sym, sym]));
    assert_eq!(TypeCheck::Fail, checker.check(&[text, int, sym, sym, sym]));
    assert_eq!(TypeCheck::Fail, checker.check(&[text, text, sym, sym]));
    assert_eq!(TypeCheck::Fail, checker.check(&[text, sym, sym, sym, sym]));
}

#[test]
fn signatures() {
    let op = JsonQuery::instance();
    assert_eq!(
        "JSON_QUERY(<arg0>, <arg1> <arg2> WRAPPER <arg3> ON EMPTY <arg4> ON ERROR)",
        op.describe_signature(5)
    );
    assert_eq!(
        "JSON_QUERY(<arg0>, <arg1> RETURNING <arg5> <arg2> WRAPPER <arg3> ON EMPTY <arg4> ON ERROR)",
        op.describe_signature(6)
    );

    insta::assert_snapshot!(op.allowed_signatures().join("\n"), @r"
    JSON_QUERY(<ANY>, <CHARACTER> <ANY> WRAPPER <ANY> ON EMPTY <ANY> ON ERROR)
    JSON_QUERY(<ANY>, <CHARACTER> RETURNING <ANY> <ANY> WRAPPER <ANY> ON EMPTY <ANY> ON ERROR)
    ");
    assert_eq!("CHARACTER", TypeFamily::Character.to_string());
}

#[test]
fn validation_through_planner() {
    let config = PlannerConfig {
        verify_unparse: true,
        ..Default::default()
    };
    let planner = Planner::new(config, OperatorTable::builtin(), Vec::<Arc<_>>::new());

    let planned = planner
        .plan_expr(
            "json_query('{\"a\": [1]}', '$.a' returning varchar(10) with array wrapper)",
            &[],
        )
        .unwrap();
    assert_eq!(
        Validated::Type(SqlType::nullable(DataType::Utf8(StringTypeMeta::varchar(10)))),
        planned.validated
    );
    assert_eq!(
        "JSON_QUERY('{\"a\": [1]}', '$.a' RETURNING VARCHAR(10) WITH UNCONDITIONAL ARRAY WRAPPER NULL ON EMPTY NULL ON ERROR)",
        planned.sql
    );

    let err = planner.plan_expr("JSON_QUERY('{}', 1.5)", &[]).unwrap_err();
    assert!(matches!(err, PlanError::Validation { .. }), "{err}");
    assert_eq!(Some(Location::new(1, 1)), err.location());

    let expr = bind("JSON_QUERY(doc, path)").unwrap();
    assert_eq!(Validated::Deferred, validate_expr(&expr).unwrap());
}

#[test]
fn returning_operand_position() {
    let call = bind_call("JSON_QUERY(doc, '$' RETURNING BIGINT)");
    assert_eq!(6, call.operands().len());
    assert_eq!(
        Some(&Operand::TypeSpec(DataType::Int64)),
        call.operand(json_query::RETURNING)
    );
}

#[test]
fn function_call_syntax_checks_operand_kinds() {
    let planner = Planner::new(
        PlannerConfig::default(),
        OperatorTable::builtin(),
        Vec::<Arc<_>>::new(),
    );

    for sql in [
        "\"JSON_QUERY\"(doc, '$', 'x')",
        "  \"JSON_QUERY\"('{}', '$', 1, 2, 3, 4)",
    ] {
        let err = planner.plan_expr(sql, &[]).unwrap_err();
        assert!(!err.is_internal(), "{sql}: {err}");
        assert!(matches!(err, PlanError::Validation { .. }), "{sql}: {err}");
        assert!(err.location().is_some(), "{sql}: {err}");
    }

    let err = planner
        .plan_expr("  \"JSON_QUERY\"('{}', '$', 1, 2, 3, 4)", &[])
        .unwrap_err();
    assert_eq!(Some(Location::new(1, 3)), err.location());

    // Only data operands in data positions is fine.
    let planned = planner.plan_expr("\"JSON_QUERY\"(doc, '$')", &[]).unwrap();
    assert_eq!(
        "JSON_QUERY(doc, '$' WITHOUT ARRAY WRAPPER NULL ON EMPTY NULL ON ERROR)",
        planned.sql
    );
}
