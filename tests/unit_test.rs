// Unit tests for acl-editor
// These tests work with the public API only

#[cfg(test)]
mod acl_tests {
    use acl_editor::{AclError, AclState, ListKind};
    use proptest::prelude::*;

    const POOL: [&str; 4] = ["alice", "bob", "carol", "dave"];

    #[derive(Clone, Debug)]
    enum Op {
        Allow(usize),
        Block(usize),
        Remove(usize),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..POOL.len()).prop_map(Op::Allow),
            (0..POOL.len()).prop_map(Op::Block),
            (0..POOL.len()).prop_map(Op::Remove),
        ]
    }

    fn apply(state: &mut AclState, op: &Op) -> Result<(), AclError> {
        match *op {
            Op::Allow(i) => state.add_to_allow(POOL[i]),
            Op::Block(i) => state.add_to_block(POOL[i]),
            Op::Remove(i) => {
                state.remove_from_both(POOL[i]);
                Ok(())
            }
        }
    }

    proptest! {
        /// No name is ever on both lists, whatever the sequence of operations.
        #[test]
        fn prop_lists_stay_disjoint(ops in prop::collection::vec(arb_op(), 0..40)) {
            let mut state = AclState::new();
            for op in &ops {
                let _ = apply(&mut state, op);
                for name in state.allowed() {
                    prop_assert!(!state.blocked().contains(name), "{} on both lists", name);
                }
            }
        }

        /// Parsing the serialized fields rebuilds the same state.
        #[test]
        fn prop_serialize_parse_roundtrip(ops in prop::collection::vec(arb_op(), 0..40)) {
            let mut state = AclState::new();
            for op in &ops {
                let _ = apply(&mut state, op);
            }
            let (allowed, blocked) = state.serialize();
            prop_assert_eq!(AclState::parse(&allowed, &blocked), state);
        }

        /// A rejected operation leaves the state exactly as it was.
        #[test]
        fn prop_rejection_is_atomic(ops in prop::collection::vec(arb_op(), 0..40)) {
            let mut state = AclState::new();
            for op in &ops {
                let before = state.clone();
                if apply(&mut state, op).is_err() {
                    prop_assert_eq!(&state, &before);
                }
            }
        }
    }

    #[test]
    fn test_allow_twice_equals_once() {
        let mut a = AclState::parse("x", "y");
        a.add_to(ListKind::Allow, "z").unwrap();
        let once = a.clone();
        a.add_to(ListKind::Allow, "z").unwrap();
        assert_eq!(a, once);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut s = AclState::parse("alice,bob", "");
        s.add_to_block("carol").unwrap();
        assert_eq!(s.serialize(), ("alice,bob".to_string(), "carol".to_string()));
        s.add_to_block("alice").unwrap();
        assert_eq!(s.serialize(), ("bob".to_string(), "carol,alice".to_string()));
        let before = s.clone();
        let err = s.add_to_allow("alice").unwrap_err();
        assert!(matches!(err, AclError::Conflict { ref username } if username == "alice"));
        assert_eq!(s, before);
    }

    #[test]
    fn test_list_kind_helpers() {
        assert_eq!(ListKind::Allow.other(), ListKind::Block);
        assert_eq!(ListKind::Block.label(), "Block");
        let s = AclState::parse("a", "b");
        assert_eq!(s.list(ListKind::Allow).as_slice(), ["a".to_string()]);
        assert_eq!(s.side_of("zzz"), None);
    }
}

#[cfg(test)]
mod directory_tests {
    use acl_editor::directory::{MAX_RESULTS, StaticDirectory, UserDirectory, match_names};

    #[test]
    fn test_static_directory_excludes_current_user() {
        let dir = StaticDirectory::new(["me", "mel", "amelia"]).excluding(Some("me".into()));
        assert_eq!(dir.lookup("me").unwrap(), vec!["mel".to_string(), "amelia".to_string()]);
    }

    #[test]
    fn test_match_names_is_case_insensitive_and_dedups() {
        let names = ["Zoe", "zoey", "Zoe", "adam"];
        assert_eq!(match_names(names, "ZO", None), vec!["Zoe".to_string(), "zoey".to_string()]);
    }

    #[test]
    fn test_match_names_cap() {
        let many: Vec<String> = (0..100).map(|i| format!("n{i}")).collect();
        let hits = match_names(many.iter().map(String::as_str), "n", None);
        assert_eq!(hits.len(), MAX_RESULTS);
        assert_eq!(hits[0], "n0");
    }
}

#[cfg(test)]
mod search_tests {
    use acl_editor::ListKind;
    use acl_editor::search::SearchSession;

    #[test]
    fn test_older_response_never_overwrites_newer() {
        let mut s = SearchSession::new(ListKind::Allow);
        let slow = s.set_query("a").unwrap();
        let fast = s.set_query("al").unwrap();
        assert!(s.accept(fast.seq, Ok(vec!["alice".into()])));
        assert!(!s.accept(slow.seq, Ok(vec!["adam".into()])));
        assert_eq!(s.results, vec!["alice".to_string()]);
        assert_eq!(s.latest_seq(), fast.seq);
    }

    #[test]
    fn test_backspace_to_empty_clears_results() {
        let mut s = SearchSession::new(ListKind::Block);
        let t = s.push_char('b').unwrap();
        s.accept(t.seq, Ok(vec!["bob".into()]));
        assert!(s.pop_char().is_none());
        assert!(s.results.is_empty());
    }
}
