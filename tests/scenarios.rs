//! End-to-end scenarios exercising the language features through
//! `compile`/`match_value`/`scan` the way a caller would, rather than
//! through the engine's internal module boundaries.

use serde_json::json;
use tendril::{compile, MatchOptions, Pattern};

fn solutions(pattern: &str, input: &serde_json::Value) -> Vec<tendril::Solution> {
    let pattern = compile(pattern).expect("pattern compiles");
    pattern
        .match_value(input, &MatchOptions::default())
        .expect("anchored match does not error")
        .solutions
}

#[test]
fn array_tail_capture_binds_the_remaining_scalar() {
    let input = json!([1, 2, 3]);
    let sols = solutions("[1 2 $x]", &input);
    assert_eq!(sols.len(), 1);
    assert_eq!(sols[0].binding("x"), Some(json!(3)));

    let short = json!([1, 2]);
    assert!(solutions("[1 2 $x]", &short).is_empty());
}

#[test]
fn strong_clause_requires_every_candidate_to_match() {
    let all_ones = json!({"a1": 1, "a2": 1});
    let sols = solutions(r#"{ /a.*/: 1 else ! }"#, &all_ones);
    assert_eq!(sols.len(), 1);

    let mixed = json!({"a1": 1, "a2": 2});
    assert!(solutions(r#"{ /a.*/: 1 else ! }"#, &mixed).is_empty());
}

#[test]
fn non_strong_flow_clause_branches_one_witness_per_successful_key() {
    // Keys whose value matches neither flow arm simply don't contribute a
    // witness; "z" (value 3) is excluded, leaving one solution per key that
    // did land in a bucket.
    let input = json!({"x": 1, "y": 2, "z": 3});
    let sols = solutions("{ $k: 1 -> %ones else 2 -> %twos }", &input);
    assert_eq!(sols.len(), 2);

    let by_k: std::collections::HashMap<_, _> = sols
        .iter()
        .map(|s| (s.binding("k").unwrap(), s.clone()))
        .collect();
    let x_sol = &by_k[&json!("x")];
    assert_eq!(x_sol.bucket("ones"), Some(json!({"x": 1})));
    assert_eq!(x_sol.bucket("twos"), None);

    let y_sol = &by_k[&json!("y")];
    assert_eq!(y_sol.bucket("twos"), Some(json!({"y": 2})));
    assert_eq!(y_sol.bucket("ones"), None);
}

#[test]
fn guard_expression_filters_on_parity_and_sign() {
    let pattern = compile("(_number as $n where $n > 0 && $n % 2 == 0)").unwrap();
    let opts = MatchOptions::default();

    assert!(pattern.has_match(&json!(4), &opts).unwrap());
    assert!(!pattern.has_match(&json!(3), &opts).unwrap());
    assert!(!pattern.has_match(&json!(-2), &opts).unwrap());
    assert!(!pattern.has_match(&json!("4"), &opts).unwrap());
}

#[test]
fn repeated_group_binding_requires_equal_subsequences() {
    // `[@x @x]` only succeeds where the array splits into two equal
    // halves; [1,2,1,2] does, an odd-length array cannot.
    let input = json!([1, 2, 1, 2]);
    let sols = solutions("[@x @x]", &input);
    assert_eq!(sols.len(), 1);
    assert_eq!(sols[0].binding("x"), Some(json!([1, 2])));

    // 3 is odd: no split gives two equal-length, equal-content halves.
    let odd = json!([1, 2, 3]);
    assert!(solutions("[@x @x]", &odd).is_empty());
}

#[test]
fn breadcrumb_key_patterns_fan_out_and_share_bindings_across_field_clauses() {
    // `$name` is bound while navigating the "planets" breadcrumb, then
    // reused as a plain value pattern in "aka[$i][0]:$name" to pick the
    // one aka-array index belonging to that planet; `$i` is in turn bound
    // there and reused as the index breadcrumb in "aka[$i][_]:$alias",
    // which fans out over every alias at that index -- including the
    // planet's own name at position 0 (spec §8 scenario 1).
    let input = json!({
        "planets": {
            "Jupiter": {"size": 11},
            "Earth": {"size": 1},
            "Ceres": {"size": 0.08},
        },
        "aka": [
            ["Jupiter", "Jove"],
            ["Earth", "Terra", "Gaia"],
            ["Ceres", "Demeter"],
        ],
    });
    let sols = solutions(
        "{planets.$name.size:$size  aka[$i][0]:$name  aka[$i][_]:$alias}",
        &input,
    );
    assert_eq!(sols.len(), 7);

    let mut by_name: std::collections::HashMap<String, Vec<(f64, String)>> = Default::default();
    for sol in &sols {
        let name = sol.binding("name").unwrap().as_str().unwrap().to_string();
        let size = sol.binding("size").unwrap().as_f64().unwrap();
        let alias = sol.binding("alias").unwrap().as_str().unwrap().to_string();
        by_name.entry(name).or_default().push((size, alias));
    }

    let mut jupiter = by_name.remove("Jupiter").unwrap();
    jupiter.sort_by(|a, b| a.1.cmp(&b.1));
    assert_eq!(
        jupiter,
        vec![(11.0, "Jove".to_string()), (11.0, "Jupiter".to_string())]
    );

    let mut earth = by_name.remove("Earth").unwrap();
    earth.sort_by(|a, b| a.1.cmp(&b.1));
    assert_eq!(
        earth,
        vec![
            (1.0, "Earth".to_string()),
            (1.0, "Gaia".to_string()),
            (1.0, "Terra".to_string())
        ]
    );

    let mut ceres = by_name.remove("Ceres").unwrap();
    ceres.sort_by(|a, b| a.1.cmp(&b.1));
    assert_eq!(
        ceres,
        vec![(0.08, "Ceres".to_string()), (0.08, "Demeter".to_string())]
    );

    assert!(by_name.is_empty());
}

#[test]
fn closed_object_rejects_uncovered_keys() {
    let exact = json!({"a": 1});
    assert_eq!(solutions("{ a:1 (!%) }", &exact).len(), 1);

    let extra = json!({"a": 1, "b": 2});
    assert!(solutions("{ a:1 (!%) }", &extra).is_empty());
}

#[test]
fn optional_field_clause_succeeds_when_key_is_absent_or_matching() {
    let without = json!({});
    assert_eq!(solutions("{ a?:1 }", &without).len(), 1);

    let present_and_right = json!({"a": 1});
    assert_eq!(solutions("{ a?:1 }", &present_and_right).len(), 1);
}

#[test]
fn kv_quant_bounds_the_total_count_of_matching_keys() {
    // The cardinality bound gates how many candidates must succeed in
    // total; it does not collapse them into one solution -- each
    // successful key still stands on its own as a witness.
    let two_keys = json!({"a": 1, "b": 2});
    assert_eq!(solutions("{ _string#{2,2}: _ }", &two_keys).len(), 2);

    let three_keys = json!({"a": 1, "b": 2, "c": 3});
    assert!(solutions("{ _string#{2,2}: _ }", &three_keys).is_empty());
}

#[test]
fn positive_lookahead_commits_bindings_without_advancing_the_cursor() {
    let input = json!([7]);
    let sols = solutions("[(?= $y) $x]", &input);
    assert_eq!(sols.len(), 1);
    assert_eq!(sols[0].binding("x"), Some(json!(7)));
    assert_eq!(sols[0].binding("y"), Some(json!(7)));
}

#[test]
fn negative_lookahead_excludes_elements_matching_its_inner_pattern() {
    assert_eq!(solutions("[(?! 99) $x]", &json!([5])).len(), 1);
    assert!(solutions("[(?! 5) $x]", &json!([5])).is_empty());
}

#[test]
fn scan_finds_matches_at_any_descendant_subtree() {
    let pattern = Pattern::compile("{ id: $id }").unwrap();
    let input = json!({
        "top": {"id": 1},
        "nested": {"deep": {"id": 2}},
        "unrelated": true,
    });
    let outcome = pattern.scan(&input, &MatchOptions::default());
    let ids: std::collections::HashSet<_> =
        outcome.hits.iter().map(|h| h.solution.binding("id").unwrap()).collect();
    assert_eq!(ids, [json!(1), json!(2)].into_iter().collect());
}

#[test]
fn case_insensitive_string_literal_matches_regardless_of_case() {
    assert!(solutions(r#""Hello"/i"#, &json!("HELLO")).len() == 1);
    assert!(solutions(r#""Hello"/i"#, &json!("hello")).len() == 1);
    assert!(solutions(r#""Hello""#, &json!("hello")).is_empty());
}
