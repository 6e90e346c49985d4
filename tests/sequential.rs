use breadboard::element::{Element, ElementKind, ElementRef};
use breadboard::pin::PinRef;

fn pins(element: &ElementRef) -> Vec<PinRef> {
    element.borrow().pins().to_vec()
}

fn set(pin: &PinRef, value: bool) {
    pin.borrow_mut().set_value(value);
}

fn get(pin: &PinRef) -> bool {
    pin.borrow().value()
}

#[test]
fn rs_latch_set_and_reset() {
    let latch = Element::new(ElementKind::rs_latch(), 0, 0);
    let p = pins(&latch);

    set(&p[0], true); // S
    latch.borrow_mut().update();
    assert!(get(&p[2]), "Q after set");
    assert!(!get(&p[3]), "Q' after set");

    set(&p[0], false);
    set(&p[1], true); // R
    latch.borrow_mut().update();
    assert!(!get(&p[2]), "Q after reset");
    assert!(get(&p[3]), "Q' after reset");
}

#[test]
fn rs_latch_holds_state() {
    let latch = Element::new(ElementKind::rs_latch(), 0, 0);
    let p = pins(&latch);

    set(&p[0], true);
    latch.borrow_mut().update();
    set(&p[0], false);
    latch.borrow_mut().update();
    assert!(get(&p[2]), "Q held with S=R=0");
    assert!(!get(&p[3]));
}

#[test]
fn rs_latch_invalid_state_is_explicit() {
    let latch = Element::new(ElementKind::rs_latch(), 0, 0);
    let p = pins(&latch);

    set(&p[0], true);
    set(&p[1], true);
    latch.borrow_mut().update();
    assert!(get(&p[2]), "Q high in the invalid state");
    assert!(get(&p[3]), "Q' high in the invalid state");
}

#[test]
fn d_flip_flop_latches_on_rising_edge() {
    let ff = Element::new(ElementKind::d_flip_flop(), 0, 0);
    let p = pins(&ff);

    // D high with the clock low does nothing
    set(&p[0], true);
    ff.borrow_mut().update();
    assert!(!get(&p[2]));

    // Rising edge captures D
    set(&p[1], true);
    ff.borrow_mut().update();
    assert!(get(&p[2]));
    assert!(!get(&p[3]));

    // D changes while the clock stays high are ignored
    set(&p[0], false);
    ff.borrow_mut().update();
    assert!(get(&p[2]), "no edge, Q unchanged");
}

#[test]
fn d_flip_flop_needs_a_fresh_edge() {
    let ff = Element::new(ElementKind::d_flip_flop(), 0, 0);
    let p = pins(&ff);

    set(&p[0], true);
    set(&p[1], true);
    ff.borrow_mut().update();
    assert!(get(&p[2]));

    // Falling edge, then D low on the next rising edge
    set(&p[1], false);
    ff.borrow_mut().update();
    assert!(get(&p[2]), "falling edge does not latch");
    set(&p[0], false);
    set(&p[1], true);
    ff.borrow_mut().update();
    assert!(!get(&p[2]));
}

#[test]
fn jk_flip_flop_modes() {
    let ff = Element::new(ElementKind::jk_flip_flop(), 0, 0);
    let p = pins(&ff);
    let clock = |j: bool, k: bool| {
        set(&p[0], j);
        set(&p[1], k);
        set(&p[2], false);
        ff.borrow_mut().update();
        set(&p[2], true);
        ff.borrow_mut().update();
        get(&p[3])
    };

    assert!(!clock(false, false), "hold from 0");
    assert!(clock(true, false), "set");
    assert!(clock(false, false), "hold from 1");
    assert!(!clock(false, true), "reset");
    assert!(clock(true, true), "toggle to 1");
    assert!(!clock(true, true), "toggle to 0");
}

#[test]
fn t_flip_flop_toggles_only_with_t_high() {
    let ff = Element::new(ElementKind::t_flip_flop(), 0, 0);
    let p = pins(&ff);
    let clock = |t: bool| {
        set(&p[0], t);
        set(&p[1], false);
        ff.borrow_mut().update();
        set(&p[1], true);
        ff.borrow_mut().update();
        get(&p[2])
    };

    assert!(!clock(false), "T low holds");
    assert!(clock(true), "first toggle");
    assert!(clock(false), "T low holds at 1");
    assert!(!clock(true), "second toggle");
}

#[test]
fn register_latches_only_with_load_high() {
    let reg = Element::new(ElementKind::register(), 0, 0);
    let p = pins(&reg);

    // Data 0b1010 on D0..D3, edge without LOAD
    set(&p[0], true);
    set(&p[2], true);
    set(&p[4], true); // CLK edge
    reg.borrow_mut().update();
    for i in 0..4 {
        assert!(!get(&p[6 + i]), "Q{i} unchanged without LOAD");
    }

    // Fresh edge with LOAD asserted
    set(&p[4], false);
    reg.borrow_mut().update();
    set(&p[5], true); // LOAD
    set(&p[4], true);
    reg.borrow_mut().update();
    assert!(get(&p[6]));
    assert!(!get(&p[7]));
    assert!(get(&p[8]));
    assert!(!get(&p[9]));
}

#[test]
fn register_pin_count() {
    let reg = Element::new(ElementKind::register(), 0, 0);
    assert_eq!(reg.borrow().input_pins().len(), 6);
    assert_eq!(reg.borrow().output_pins().len(), 4);
}

#[test]
fn clock_toggles_at_frequency() {
    let clock = Element::new(ElementKind::clock(2), 0, 0);
    let p = pins(&clock);

    clock.borrow_mut().update();
    assert!(!get(&p[0]), "one update at frequency 2 is not enough");
    clock.borrow_mut().update();
    assert!(get(&p[0]), "flips on the second update");
    clock.borrow_mut().update();
    clock.borrow_mut().update();
    assert!(!get(&p[0]), "flips back after two more");
}

#[test]
fn disabled_clock_never_toggles() {
    let clock = Element::new(ElementKind::clock(1), 0, 0);
    if let ElementKind::Clock { enabled, .. } = clock.borrow_mut().kind_mut() {
        *enabled = false;
    }
    let p = pins(&clock);
    for _ in 0..10 {
        clock.borrow_mut().update();
    }
    assert!(!get(&p[0]));
}
