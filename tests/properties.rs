use dice_notation::{parse, Ast, Node};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

fn dice_operand(ast: &Ast) -> dice_notation::NodeId {
    match *ast.node(ast.root().unwrap()) {
        Node::Infix(_, _, rhs) => rhs,
        ref node => panic!("expected infix root, got {node:?}"),
    }
}

proptest! {
    #[test]
    fn dice_stay_in_range(count in 1i64..30, sides in 1i64..120, seed: u64) {
        let ast = parse(&format!("{count}d{sides}")).unwrap();
        let evaluation = ast.evaluate(&mut StdRng::seed_from_u64(seed)).unwrap();

        prop_assert!((count..=count * sides).contains(&evaluation.value()));
        prop_assert_eq!(evaluation.breakdown().len() as i64, count);
        prop_assert!(evaluation.breakdown().iter().all(|r| (1..=sides).contains(r)));
    }

    #[test]
    fn best_and_worst_keep_a_sorted_subset(
        count in 1i64..20,
        sides in 1i64..20,
        keep in 0i64..20,
        best: bool,
        seed: u64,
    ) {
        prop_assume!(keep <= count);
        let op = if best { "b" } else { "w" };
        let ast = parse(&format!("{keep}{op}{count}d{sides}")).unwrap();
        let evaluation = ast.evaluate(&mut StdRng::seed_from_u64(seed)).unwrap();

        let kept = evaluation.breakdown();
        prop_assert_eq!(kept.len() as i64, keep);
        prop_assert!(kept.windows(2).all(|pair| pair[0] <= pair[1]));
        prop_assert!((keep..=keep * sides).contains(&evaluation.value()));

        let mut rolled = evaluation.outcome(dice_operand(&ast)).unwrap().breakdown.clone();
        rolled.sort_unstable();
        let expected = if best {
            &rolled[rolled.len() - kept.len()..]
        } else {
            &rolled[..kept.len()]
        };
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn keeping_more_than_rolled_fails(count in 0i64..10, extra in 1i64..10, seed: u64) {
        let ast = parse(&format!("{}b{count}d6", count + extra)).unwrap();
        prop_assert!(ast.evaluate(&mut StdRng::seed_from_u64(seed)).is_err());
    }

    #[test]
    fn division_by_zero_always_fails(numerator in 0i64..1000) {
        let ast = parse(&format!("{numerator}/0")).unwrap();
        prop_assert!(ast.evaluate(&mut StdRng::seed_from_u64(0)).is_err());
    }

    #[test]
    fn evaluation_is_reproducible(count in 1i64..10, sides in 1i64..20, seed: u64) {
        let input = format!("{count}b({count}d{sides}!)+{count}dF*d%");
        let ast = parse(&input).unwrap();
        prop_assert_eq!(&ast, &parse(&input).unwrap());

        let first = ast.evaluate(&mut StdRng::seed_from_u64(seed));
        let second = ast.evaluate(&mut StdRng::seed_from_u64(seed));
        prop_assert!(first.is_ok());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn fudge_dice_are_balanced(count in 1i64..50, seed: u64) {
        let ast = parse(&format!("{count}dF")).unwrap();
        let evaluation = ast.evaluate(&mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert!(evaluation.breakdown().iter().all(|r| (-1..=1).contains(r)));
        prop_assert!((-count..=count).contains(&evaluation.value()));
    }
}
