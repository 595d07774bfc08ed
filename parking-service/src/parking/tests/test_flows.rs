use super::*;

// ------------------------------------------------------------------------
// 完整停车周期: 入场 → 出场 → 车位复用
// ------------------------------------------------------------------------
#[test]
fn test_spot_reused_after_exit() {
    let manager = create_test_manager();

    let first = manager.process_entry("A", VehicleCategory::Bike, T0).unwrap();
    manager.process_entry("B", VehicleCategory::Bike, T0).unwrap();
    manager.process_exit("A", T0 + HOUR).unwrap();

    // A's spot is the lowest free one again
    let next = manager.process_entry("C", VehicleCategory::Bike, T0 + HOUR).unwrap();
    assert_eq!(next.ticket.spot_id, first.ticket.spot_id);
    assert_ne!(next.ticket.id, first.ticket.id);
}

// ------------------------------------------------------------------------
// 车位占用 ⇔ 存在未结票据
// ------------------------------------------------------------------------
#[test]
fn test_spot_availability_matches_open_tickets() {
    let manager = create_test_manager();
    let regs = ["A", "B", "C"];

    for reg in regs {
        manager.process_entry(reg, VehicleCategory::Car, T0).unwrap();
    }
    manager.process_exit("B", T0 + HOUR).unwrap();

    let store = manager.store();
    let open_spots: Vec<u32> = regs
        .iter()
        .filter_map(|reg| store.find_open_ticket(reg).unwrap())
        .map(|ticket| ticket.spot_id)
        .collect();

    for spot in store.spots(VehicleCategory::Car).unwrap() {
        assert_eq!(
            spot.available,
            !open_spots.contains(&spot.id),
            "spot {} out of sync",
            spot.id
        );
    }
}

// ------------------------------------------------------------------------
// 票据不复用: 每次入场都是新票
// ------------------------------------------------------------------------
#[test]
fn test_each_visit_gets_new_ticket() {
    let manager = create_test_manager();

    for visit in 0..3 {
        let start = T0 + visit * 2 * HOUR;
        manager
            .process_entry("ABCDEF", VehicleCategory::Car, start)
            .unwrap();
        manager.process_exit("ABCDEF", start + HOUR).unwrap();
    }

    let history = manager.store().tickets_for_vehicle("ABCDEF").unwrap();
    assert_eq!(history.len(), 3);
    assert!(history.iter().all(|t| !t.is_open()));
    // Only the first visit pays full price
    let prices: Vec<f64> = history.iter().map(|t| t.price).collect();
    assert_eq!(prices, vec![0.75, 0.71, 0.71]);
}
