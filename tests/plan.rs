mod tests {
    use lcd_text_composer::{Direction, ScrollPlan};

    fn offsets(plan: &ScrollPlan, phase: usize) -> Vec<usize> {
        let phase = plan.phase(phase).expect("phase exists");
        (0..phase.len())
            .map(|i| phase.offset(i).expect("offset in bounds"))
            .collect()
    }

    // "HELLO WORLD" is 11 chars on an 8-column display: shifts = 3.

    #[test]
    fn test_left_is_one_ascending_phase() {
        let plan = ScrollPlan::compute(11, 8, Direction::Left);
        assert_eq!(plan.shifts(), 3);
        assert_eq!(offsets(&plan, 0), vec![0, 1, 2, 3]);
        assert!(plan.phase(1).is_none());
    }

    #[test]
    fn test_right_is_one_descending_phase() {
        let plan = ScrollPlan::compute(11, 8, Direction::Right);
        assert_eq!(offsets(&plan, 0), vec![3, 2, 1, 0]);
        assert!(plan.phase(1).is_none());
    }

    #[test]
    fn test_both_lr_skips_turnaround_offset() {
        let plan = ScrollPlan::compute(11, 8, Direction::BothLr);
        assert_eq!(offsets(&plan, 0), vec![0, 1, 2, 3]);
        assert_eq!(offsets(&plan, 1), vec![2, 1, 0]);
    }

    #[test]
    fn test_both_rl_skips_turnaround_offset() {
        let plan = ScrollPlan::compute(11, 8, Direction::BothRl);
        assert_eq!(offsets(&plan, 0), vec![3, 2, 1, 0]);
        assert_eq!(offsets(&plan, 1), vec![1, 2, 3]);
    }

    #[test]
    fn test_single_shift_left() {
        // Text exactly one char wider than the display.
        let plan = ScrollPlan::compute(9, 8, Direction::Left);
        assert_eq!(plan.shifts(), 1);
        assert_eq!(offsets(&plan, 0), vec![0, 1]);
    }

    #[test]
    fn test_zero_shifts_second_phase_is_empty() {
        let plan = ScrollPlan::compute(8, 8, Direction::BothLr);
        assert_eq!(plan.shifts(), 0);
        assert_eq!(offsets(&plan, 0), vec![0]);
        assert!(plan.phase(1).expect("second phase exists").is_empty());
        assert_eq!(plan.first_non_empty_phase(), Some(0));
        assert_eq!(plan.next_non_empty_phase(1), None);
    }

    #[test]
    fn test_offset_lookup_past_end_is_none() {
        let plan = ScrollPlan::compute(11, 8, Direction::Left);
        assert_eq!(plan.phase(0).expect("phase exists").offset(4), None);
    }
}
