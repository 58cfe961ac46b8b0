use crate::{parse_line, parse_source, Parser};
use basic_ir::{
    BranchTarget, DataValue, Expr, InfixOp, JumpKind, PrefixOp, Statement, ValueType,
};
use pretty_assertions::assert_eq;

fn line(source: &str) -> basic_ir::Line {
    match parse_line(source) {
        Ok(line) => line,
        Err(errors) => panic!("parse of {source:?} failed: {errors:?}"),
    }
}

fn stmt(source: &str) -> Statement {
    line(source).stmt
}

fn rendered(source: &str) -> String {
    stmt(source).to_string()
}

// --- statement shapes ---

#[test]
fn let_with_and_without_keyword() {
    let with = stmt("LET A = 1");
    let without = stmt("A = 1");
    assert_eq!(with.to_string(), "LET A = 1");
    assert_eq!(without.to_string(), "LET A = 1");
}

#[test]
fn let_multiple_targets_share_one_value() {
    match stmt("LET A, B, C = 0") {
        Statement::Let { targets, .. } => {
            let names: Vec<_> = targets.iter().map(|t| t.ident.name.as_str()).collect();
            assert_eq!(names, vec!["A", "B", "C"]);
        }
        other => panic!("expected LET, got {other:?}"),
    }
}

#[test]
fn let_array_target_keeps_indices() {
    match stmt("A(1, J + 1) = 5") {
        Statement::Let { targets, .. } => {
            assert_eq!(targets[0].indices.len(), 2);
        }
        other => panic!("expected LET, got {other:?}"),
    }
}

#[test]
fn line_number_is_split_off() {
    let parsed = line("10 PRINT \"HI\"");
    assert_eq!(parsed.number, Some(10));
    assert_eq!(parsed.stmt.to_string(), "PRINT \"HI\"");
}

#[test]
fn bare_line_number_is_an_empty_statement() {
    let parsed = line("10");
    assert_eq!(parsed.number, Some(10));
    assert!(matches!(parsed.stmt, Statement::Empty { .. }));
}

#[test]
fn compound_line_shares_the_number() {
    let parsed = line("10 LET A = 1 : LET B = 2 : PRINT A + B");
    assert_eq!(parsed.number, Some(10));
    match &parsed.stmt {
        Statement::Compound { statements, .. } => assert_eq!(statements.len(), 3),
        other => panic!("expected compound, got {other:?}"),
    }
}

#[test]
fn print_separators_have_no_ast_effect() {
    for source in ["PRINT \"A\" B", "PRINT \"A\", B", "PRINT \"A\"; B"] {
        match stmt(source) {
            Statement::Print { args, .. } => assert_eq!(args.len(), 2, "{source}"),
            other => panic!("expected PRINT, got {other:?}"),
        }
    }
}

#[test]
fn question_mark_parses_as_print() {
    assert_eq!(rendered("? 1 + 2"), "PRINT 1 + 2");
}

#[test]
fn input_prompt_and_targets() {
    match stmt("INPUT \"NAME\"; A$, B") {
        Statement::Input {
            prompt, targets, ..
        } => {
            assert_eq!(prompt.as_deref(), Some("NAME"));
            assert_eq!(targets.len(), 2);
            assert_eq!(targets[0].value_type(), ValueType::Str);
        }
        other => panic!("expected INPUT, got {other:?}"),
    }
}

#[test]
fn goto_rejects_non_integer_targets() {
    for source in ["GOTO \"X\"", "GOTO 1.5", "GOTO A"] {
        assert!(parse_line(source).is_err(), "{source} should not parse");
    }
}

#[test]
fn if_forms() {
    match stmt("IF A < 1 THEN 30") {
        Statement::If { then_branch, .. } => assert_eq!(then_branch, BranchTarget::Line(30)),
        other => panic!("expected IF, got {other:?}"),
    }
    match stmt("IF A < 1 GOTO 30") {
        Statement::If { then_branch, .. } => assert_eq!(then_branch, BranchTarget::Line(30)),
        other => panic!("expected IF, got {other:?}"),
    }
    match stmt("IF A THEN PRINT \"Y\" ELSE PRINT \"N\"") {
        Statement::If {
            then_branch,
            else_branch,
            ..
        } => {
            assert!(matches!(then_branch, BranchTarget::Stmt(_)));
            assert!(matches!(else_branch, Some(BranchTarget::Stmt(_))));
        }
        other => panic!("expected IF, got {other:?}"),
    }
}

#[test]
fn if_without_then_is_an_error() {
    assert!(parse_line("IF A PRINT \"X\"").is_err());
}

#[test]
fn for_with_default_step() {
    match stmt("FOR I = 1 TO 10") {
        Statement::For { step, .. } => assert!(step.is_none()),
        other => panic!("expected FOR, got {other:?}"),
    }
    assert_eq!(rendered("FOR I = 10 TO 1 STEP -1"), "FOR I = 10 TO 1 STEP -1");
}

#[test]
fn next_with_and_without_iterators() {
    match stmt("NEXT") {
        Statement::Next { iterators, .. } => assert!(iterators.is_empty()),
        other => panic!("expected NEXT, got {other:?}"),
    }
    match stmt("NEXT I, J") {
        Statement::Next { iterators, .. } => assert_eq!(iterators.len(), 2),
        other => panic!("expected NEXT, got {other:?}"),
    }
}

#[test]
fn data_accepts_the_legal_shapes_only() {
    match stmt("DATA 1, 2.5, \"S\"; FOO, -3, -1.5") {
        Statement::Data { values, .. } => {
            assert_eq!(
                values,
                vec![
                    DataValue::Int(1),
                    DataValue::Float(2.5),
                    DataValue::Str("S".to_string()),
                    DataValue::Str("FOO".to_string()),
                    DataValue::Int(-3),
                    DataValue::Float(-1.5),
                ]
            );
        }
        other => panic!("expected DATA, got {other:?}"),
    }
    assert!(parse_line("DATA (1)").is_err());
    assert!(parse_line("DATA -\"X\"").is_err());
}

#[test]
fn def_fn_shapes() {
    match stmt("DEF FN F(X) = X * X") {
        Statement::Def { name, param, .. } => {
            assert_eq!(name.name, "F");
            assert_eq!(param.map(|p| p.name), Some("X".to_string()));
        }
        other => panic!("expected DEF, got {other:?}"),
    }
    match stmt("DEF FN Z() = 42") {
        Statement::Def { param, .. } => assert!(param.is_none()),
        other => panic!("expected DEF, got {other:?}"),
    }
}

#[test]
fn dim_multiple_declarations() {
    match stmt("DIM A(10), B(2, 3)") {
        Statement::Dim { decls, .. } => {
            assert_eq!(decls.len(), 2);
            assert_eq!(decls[1].dims.len(), 2);
        }
        other => panic!("expected DIM, got {other:?}"),
    }
}

#[test]
fn on_goto_and_gosub() {
    match stmt("ON X GOTO 10, 20, 30") {
        Statement::On { kind, lines, .. } => {
            assert_eq!(kind, JumpKind::Goto);
            assert_eq!(lines, vec![10, 20, 30]);
        }
        other => panic!("expected ON, got {other:?}"),
    }
    match stmt("ON X + 1 GOSUB 100") {
        Statement::On { kind, .. } => assert_eq!(kind, JumpKind::Gosub),
        other => panic!("expected ON, got {other:?}"),
    }
    assert!(parse_line("ON X GOTO A").is_err());
}

#[test]
fn list_ranges() {
    assert_eq!(rendered("LIST"), "LIST");
    assert_eq!(rendered("LIST 10"), "LIST 10");
    assert_eq!(rendered("LIST 10-"), "LIST 10-");
    assert_eq!(rendered("LIST -20"), "LIST -20");
    assert_eq!(rendered("LIST 10-20"), "LIST 10-20");
}

#[test]
fn graphics_statements() {
    assert_eq!(rendered("GRAPHICS 320, 200"), "GRAPHICS 320, 200");
    assert_eq!(
        rendered("DRAW C$, 0, 0 TO 10, 10"),
        "DRAW C$, 0, 0 TO 10, 10"
    );
    assert_eq!(rendered("DRAW C$, 5, 5"), "DRAW C$, 5, 5");
    assert_eq!(rendered("BOX C$, 1, 2, 3, 4"), "BOX C$, 1, 2, 3, 4");
}

#[test]
fn rem_keeps_its_text() {
    assert_eq!(rendered("REM hello : not a statement"), "REM hello : not a statement");
}

// --- expressions ---

#[test]
fn precedence_ladder() {
    assert_eq!(rendered("PRINT 1 + 2 * 3"), "PRINT 1 + 2 * 3");
    match stmt("PRINT 1 + 2 * 3") {
        Statement::Print { args, .. } => match &args[0] {
            Expr::Infix { op, right, .. } => {
                assert_eq!(*op, InfixOp::Add);
                assert!(matches!(**right, Expr::Infix { op: InfixOp::Mul, .. }));
            }
            other => panic!("expected infix, got {other:?}"),
        },
        other => panic!("expected PRINT, got {other:?}"),
    }
}

#[test]
fn comparison_binds_tighter_than_and() {
    match stmt("PRINT A < 1 AND B > 2") {
        Statement::Print { args, .. } => {
            assert!(matches!(
                &args[0],
                Expr::Infix { op: InfixOp::And, .. }
            ));
        }
        other => panic!("expected PRINT, got {other:?}"),
    }
}

#[test]
fn equals_is_equality_inside_expressions() {
    match stmt("PRINT A = 1") {
        Statement::Print { args, .. } => {
            assert!(matches!(&args[0], Expr::Infix { op: InfixOp::Eq, .. }));
        }
        other => panic!("expected PRINT, got {other:?}"),
    }
}

#[test]
fn not_binds_looser_than_comparison() {
    match stmt("PRINT NOT A = 1") {
        Statement::Print { args, .. } => match &args[0] {
            Expr::Prefix { op, operand, .. } => {
                assert_eq!(*op, PrefixOp::Not);
                assert!(matches!(**operand, Expr::Infix { op: InfixOp::Eq, .. }));
            }
            other => panic!("expected NOT prefix, got {other:?}"),
        },
        other => panic!("expected PRINT, got {other:?}"),
    }
}

#[test]
fn fn_requires_a_call() {
    assert_eq!(rendered("PRINT FN F(3)"), "PRINT FN F(3)");
    assert!(parse_line("PRINT FN F").is_err());
}

#[test]
fn grouped_expressions_round_trip() {
    assert_eq!(rendered("PRINT (1 + 2) * 3"), "PRINT (1 + 2) * 3");
}

// --- line references ---

#[test]
fn line_refs_of_a_compound_line() {
    let parsed = line("10 GOSUB 100 : IF A THEN 200 ELSE 300 : ON B GOTO 400, 500");
    assert_eq!(parsed.stmt.line_refs(), vec![100, 200, 300, 400, 500]);
}

// --- errors & recovery ---

#[test]
fn errors_accumulate_and_later_statements_still_parse() {
    let mut parser = Parser::from_source("GOTO \"X\" : PRINT 1");
    let parsed = parser.parse_line();
    assert_eq!(parser.errors().len(), 1);
    // The PRINT after the bad GOTO survived.
    assert!(parsed.stmt.to_string().contains("PRINT 1"));
}

#[test]
fn trailing_garbage_is_an_unexpected_token() {
    let mut parser = Parser::from_source("PRINT 1 )");
    parser.parse_line();
    assert!(!parser.errors().is_empty());
}

#[test]
fn illegal_character_surfaces_as_parse_error() {
    assert!(parse_line("PRINT 1 ! 2").is_err());
}

// --- round-trip law: parse(render(s)) == s up to whitespace ---

#[test]
fn canonical_rendering_is_a_fixed_point() {
    let sources = [
        "10 LET A = 1 : LET B = 2 : LET C = A + B",
        "20 PRINT \"ans=\" C",
        "30 IF A < B THEN 10 ELSE PRINT \"done\"",
        "40 FOR I = 1 TO 10 STEP 2 : PRINT I : NEXT I",
        "50 DATA 1, -2, 3.5, \"X\"",
        "60 READ A, B(1, 2)",
        "70 DEF FN SQ(X) = X * X",
        "80 ON X GOSUB 100, 200",
        "90 DIM A(10), B(2, 3)",
        "100 DRAW RGB(255, 0, 0), 0, 0 TO 10, 10",
        "110 BOX C$, 1, 2, 3, 4",
        "120 INPUT \"N\"; A$",
        "130 GRAPHICS 320, 200",
        "140 PRINT NOT A AND B OR C",
        "150 PRINT -(1 + 2) ^ 2",
    ];
    for source in sources {
        let first = line(source);
        let rendered_once = first.to_string();
        let second = match parse_line(&rendered_once) {
            Ok(line) => line,
            Err(errors) => panic!("re-parse of {rendered_once:?} failed: {errors:?}"),
        };
        assert_eq!(
            second.to_string(),
            rendered_once,
            "round trip diverged for {source:?}"
        );
        assert_eq!(second.number, first.number);
    }
}

// --- multi-line sources ---

#[test]
fn parse_source_splits_physical_lines() {
    let lines = match parse_source("10 PRINT \"A\"\n\n20 GOTO 10\n") {
        Ok(lines) => lines,
        Err(errors) => panic!("parse_source failed: {errors:?}"),
    };
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].number, Some(10));
    assert_eq!(lines[1].number, Some(20));
}

#[test]
fn parse_source_collects_errors_from_all_lines() {
    let errors = match parse_source("10 GOTO \"A\"\n20 PRINT )\n30 PRINT 1") {
        Err(errors) => errors,
        Ok(_) => panic!("expected errors"),
    };
    assert!(errors.len() >= 2);
}
