//! Order Approval Workflow
//!
//! This example demonstrates a table-driven approval machine with handlers,
//! a guard, a commit hook and an extended definition.
//!
//! Key concepts:
//! - Transitions declared as source => { symbol => destination }
//! - Initial and terminal states deduced from the table
//! - Handlers subscribed to (from, symbol, to) patterns
//! - A child definition inheriting its parent's spec and handlers
//! - A commit hook persisting each new state, then resuming from it
//!
//! Run with: cargo run --example order_approval

use serde_json::json;
use statekeeper::builder::Definition;
use statekeeper::core::State;
use statekeeper::engine::Machine;
use statekeeper::handlers::HandlerError;
use statekeeper::transitions;
use std::sync::{Arc, Mutex};

// Simple order store standing in for a database row
#[derive(Default)]
struct OrderStore {
    status: Option<&'static str>,
}

fn main() {
    println!("=== Order Approval Workflow ===\n");

    let orders = Definition::<&str, &str>::builder("order")
        .transitions(transitions! {
            State::new("submitted").with_label("Submitted") => {
                "approve" => State::new("approved").with_label("Approved"),
                "reject" => State::new("rejected").with_label("Rejected"),
            },
            "approved" => {
                "ship" => State::new("shipped").with_label("Shipped"),
                "reject" => "rejected",
            },
        })
        .guard(|ctx| ctx.symbol != Some(&"ship") || ctx.from.code == "approved")
        .build();

    println!("States:");
    for state in orders.states().expect("order table").iter() {
        println!(
            "  {} initial={} terminal={}",
            state,
            state.is_initial(),
            state.is_terminal()
        );
    }
    println!();

    orders
        .subscribe()
        .to("rejected")
        .register("send_rejection_notice", |_, ctx| {
            println!("  [Mail] Order rejected while {}", ctx.from);
            Ok(json!({ "notified": true }))
        });
    orders
        .subscribe()
        .from("approved")
        .on("ship")
        .register("book_courier", |_, _| {
            Err(HandlerError::failed("courier API unavailable"))
        });

    let store = Arc::new(Mutex::new(OrderStore::default()));
    let sink = Arc::clone(&store);
    let mut order = Machine::new(Arc::clone(&orders))
        .expect("valid definition")
        .with_commit(move |code| {
            sink.lock().map_err(|err| err.to_string())?.status = Some(*code);
            Ok(())
        });

    println!("Order starts as: {}", order.current_state().expect("known state"));
    println!("Available symbols: {:?}\n", order.available_symbols());

    println!("Approving order...");
    order.transition("approve").expect("approve is defined");
    println!("  Now: {}", order.current_state().expect("known state"));

    println!("Shipping order...");
    for dispatched in order.transition("ship").expect("ship is defined") {
        println!("  Handler {} -> {:?}", dispatched.name, dispatched.outcome);
    }
    println!("  Now: {} (terminal: {})\n", order.current_state().expect("known state"), order.is_terminal());

    println!("Trying to reject a shipped order...");
    match order.transition("reject") {
        Ok(_) => println!("  Unexpectedly rejected"),
        Err(err) => println!("  Refused: {}", err),
    }

    let stored = store.lock().expect("store lock").status;
    println!("\nPersisted status: {:?}", stored);

    println!("\n=== Resuming and extending ===\n");

    let rush_orders = Definition::extend(&orders, "rush_order").build();
    rush_orders
        .subscribe()
        .from("submitted")
        .register("page_on_call", |machine, _| {
            Ok(json!(format!("{} moved", machine.definition().name())))
        });

    let mut rush = Machine::resume(Arc::clone(&rush_orders), None).expect("valid definition");
    println!("Rejecting a rush order...");
    for dispatched in rush.transition("reject").expect("reject is defined") {
        println!("  Handler {} -> {:?}", dispatched.name, dispatched.outcome);
    }

    let mut resumed = Machine::resume(orders, Some("approved")).expect("valid definition");
    println!("\nResumed order at: {}", resumed.current_state().expect("known state"));
    resumed.transition("reject").expect("reject is defined");
    println!("  Now: {}", resumed.current_state().expect("known state"));

    println!("\n=== Example Complete ===");
}
