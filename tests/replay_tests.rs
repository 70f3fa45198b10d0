// Snapshot history and replay tests

use heapwalk::config::RunConfig;
use heapwalk::driver::engine::Driver;
use heapwalk::driver::step::Step;
use heapwalk::memory::value::Value;

fn finished_driver() -> Driver {
    let mut driver = Driver::new(RunConfig::default());
    driver.run().expect("Execution failed");
    driver
}

#[test]
fn test_one_snapshot_per_step_plus_initial() {
    let driver = finished_driver();
    assert_eq!(driver.total_snapshots(), driver.plan().len() + 1);
    assert_eq!(driver.history_position(), driver.total_snapshots() - 1);
    assert_eq!(driver.current_step(), Some(driver.plan().len() - 1));
}

#[test]
fn test_rewind_to_start_shows_empty_state() {
    let mut driver = finished_driver();
    driver.rewind_to_start().expect("Rewind failed");

    assert_eq!(driver.history_position(), 0);
    assert_eq!(driver.current_step(), None);
    assert!(driver.heap().allocations().is_empty());
    assert_eq!(driver.terminal().contents(), "");
    assert_eq!(driver.locals().a, Value::Null);
}

#[test]
fn test_step_backward_then_forward_restores_output() {
    let mut driver = finished_driver();
    let final_output = driver.terminal().contents();

    while driver.step_backward().is_ok() {}
    assert_eq!(driver.history_position(), 0);

    while driver.step_forward().is_ok() {}
    assert_eq!(driver.terminal().contents(), final_output);
    assert_eq!(driver.history_position(), driver.total_snapshots() - 1);
}

#[test]
fn test_step_backward_undoes_scalar_print() {
    let mut driver = finished_driver();

    // Exit -> PrintScalar
    driver.step_backward().expect("Step backward failed");
    assert_eq!(
        driver.plan()[driver.current_step().expect("no step")],
        Step::PrintScalar
    );
    assert!(driver.terminal().contents().contains("foo -->123"));

    // PrintScalar -> AllocateScalar
    driver.step_backward().expect("Step backward failed");
    assert!(!driver.terminal().contents().contains("foo -->"));
    assert!(matches!(driver.locals().heap_addr, Value::Pointer(_)));

    // AllocateScalar -> PrintFinal
    driver.step_backward().expect("Step backward failed");
    assert_eq!(driver.locals().heap_addr, Value::Uninitialized);
    assert_eq!(driver.heap().allocations().len(), 1);
}

#[test]
fn test_cursor_moves_while_replaying_loop() {
    let mut driver = finished_driver();
    driver.rewind_to_start().expect("Rewind failed");

    let mut cursors = Vec::new();
    while driver.step_forward().is_ok() {
        if let Some(index) = driver.current_step() {
            if let Step::Advance(_) = driver.plan()[index] {
                cursors.push(driver.locals().a);
            }
        }
    }

    let expected: Vec<Value> = (1..=10u64)
        .map(|n| Value::Pointer(0x1000_0000 + n * 4))
        .collect();
    assert_eq!(cursors, expected);
}

#[test]
fn test_history_bounds() {
    let mut driver = finished_driver();
    assert!(driver.step_forward().is_err());

    driver.rewind_to_start().expect("Rewind failed");
    assert!(driver.step_backward().is_err());

    driver.jump_to_end().expect("Jump failed");
    assert_eq!(driver.current_step(), Some(driver.plan().len() - 1));
}

#[test]
fn test_release_visible_in_history() {
    let config = RunConfig {
        release_on_exit: true,
        ..RunConfig::default()
    };
    let mut driver = Driver::new(config);
    driver.run().expect("Execution failed");

    // Exit -> Release -> PrintScalar
    driver.step_backward().expect("Step backward failed");
    assert_eq!(driver.heap().leaks(), vec![]);
    driver.step_backward().expect("Step backward failed");
    assert_eq!(driver.heap().leaks().len(), 2);
}
