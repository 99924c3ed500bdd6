// End-to-end dealership scenarios
//
// Walks a single car through its whole life (added, rejected as a
// duplicate, a bad edit, sold) and checks the properties that must hold
// for any inventory.

use dealer_core::{Car, CarChanges, DealerConfig, DealerError, DealerManager};

const CIVIC_VIN: &str = "1HGCM82633A004352";

fn civic() -> Car {
    Car::new("Honda", "Civic", 2020, 25000.0, CIVIC_VIN, "").unwrap()
}

#[test]
fn test_civic_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let mut manager = DealerManager::new(DealerConfig::in_dir(dir.path()));

    // Added once
    manager.add(civic()).expect("first add should succeed");
    assert_eq!(manager.len(), 1);

    // Second add with the same VIN fails and changes nothing
    let err = manager.add(civic()).unwrap_err();
    assert!(matches!(err, DealerError::Duplicate(_)));
    assert_eq!(manager.len(), 1);

    // Negative price is rejected and the stored price stays
    let err = manager
        .edit(CIVIC_VIN, &CarChanges::new().price(-5.0))
        .unwrap_err();
    assert!(matches!(err, DealerError::Validation(_)));
    assert_eq!(manager.find_by_vin(CIVIC_VIN).unwrap().price(), 25000.0);

    // Sold
    let sale = manager.remove(CIVIC_VIN).expect("sale should succeed");
    assert_eq!(sale.vin(), CIVIC_VIN);
    assert_eq!(manager.len(), 0);
    assert_eq!(manager.sales().len(), 1);

    let value = serde_json::to_value(&manager.sales()[0]).unwrap();
    assert!(value.get("sale_date").is_some());
}

#[test]
fn test_construct_serialize_construct_is_identity() {
    let inputs = [
        ("  honda ", "civic", 2020, 25000.0, "1hgcm82633a004352", ""),
        ("MERCEDES-BENZ", "gle 350", 2024, 61999.99, "4JGDA5HB7JB123456", "gle.png"),
        ("ford", "f-150", 1900, 0.01, " 1FTFW1ET5DFC10312 ", "  "),
    ];

    for (make, model, year, price, vin, image) in inputs {
        let car = Car::new(make, model, year, price, vin, image).unwrap();
        let record = car.to_record();
        let rebuilt = Car::new(
            &record.make,
            &record.model,
            record.year as i32,
            record.price,
            &record.vin,
            &record.image_url,
        )
        .unwrap();
        assert_eq!(rebuilt, car);

        let from_json: Car = serde_json::from_value(serde_json::to_value(&car).unwrap()).unwrap();
        assert_eq!(from_json, car);
    }
}

#[test]
fn test_find_by_vin_ignores_case_and_whitespace() {
    let mut manager = DealerManager::new(DealerConfig::default());
    manager.add(civic()).unwrap();

    for query in [CIVIC_VIN, "1hgcm82633a004352", "  1HgCm82633a004352\t"] {
        assert_eq!(manager.find_by_vin(query), Some(&civic()));
    }
}

#[test]
fn test_repeated_duplicate_adds_never_grow_inventory() {
    let mut manager = DealerManager::new(DealerConfig::default());
    manager.add(civic()).unwrap();

    for _ in 0..5 {
        assert!(manager.add(civic()).is_err());
        assert_eq!(manager.len(), 1);
    }
}

#[test]
fn test_report_revenue_matches_log() {
    let mut manager = DealerManager::new(DealerConfig::default());
    let stock = [
        ("Toyota", "Camry", 30000.0, "4T1BF1FK5CU500001"),
        ("Toyota", "Corolla", 21000.5, "2T1BURHE0JC000002"),
        ("Honda", "Cr-V", 32000.25, "2HKRW2H59KH000003"),
    ];
    for (make, model, price, vin) in stock {
        manager
            .add(Car::new(make, model, 2022, price, vin, "").unwrap())
            .unwrap();
    }

    for (_, _, _, vin) in stock {
        manager.remove(vin).unwrap();
    }

    let report = manager.sales_report();
    assert_eq!(report.total_sold, 3);
    let expected: f64 = stock.iter().map(|s| s.2).sum();
    assert!((report.total_revenue - expected).abs() < 1e-9);

    for pair in report.history.windows(2) {
        assert!(pair[0].sale_date() >= pair[1].sale_date());
    }
    assert_eq!(report.history[0].car().model(), "Cr-V");
}

#[test]
fn test_search_blank_returns_everything_and_misses_are_empty() {
    let mut manager = DealerManager::new(DealerConfig::default());
    manager.add(civic()).unwrap();
    manager
        .add(Car::new("Tesla", "Model 3", 2023, 40000.0, "5YJ3E1EA7JF000004", "").unwrap())
        .unwrap();

    assert_eq!(manager.search("").len(), manager.len());
    assert_eq!(manager.search("MODEL").len(), 1);
    assert!(manager.search("lamborghini").is_empty());
}
