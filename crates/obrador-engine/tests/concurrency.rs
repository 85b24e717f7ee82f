use obrador_core::{MaterialInput, Money, ProductInput, RecipeLine, SaleInput, Unit};
use obrador_engine::{Bakery, EngineConfig, ErrorKind};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn stocked_bakery(harina: Decimal) -> (Bakery, String, String) {
    let bakery = Bakery::new(EngineConfig::default());
    let material = bakery
        .create_material(MaterialInput {
            name: "Harina".to_string(),
            unit: Unit::Kilogram,
            quantity: harina,
            unit_cost: Money::from_units(25),
        })
        .unwrap();
    let product = bakery
        .create_product(ProductInput {
            name: "Pastel".to_string(),
            description: None,
            reference_price: Money::from_units(450),
            recipe: vec![RecipeLine::new(material.id.clone(), dec!(0.5))],
        })
        .unwrap();
    (bakery, material.id, product.id)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_commits_never_oversell() {
    // Room for exactly 7 sales of 3
    let (bakery, harina, pastel) = stocked_bakery(dec!(10.5));

    let mut handles = Vec::new();
    for _ in 0..20 {
        let bakery = bakery.clone();
        let pastel = pastel.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            bakery.commit_sale(SaleInput {
                product_id: pastel,
                unit_price: Money::from_units(450),
                quantity: 3,
            })
        }));
    }

    let mut committed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => committed += 1,
            Err(err) => assert_eq!(err.kind(), ErrorKind::BusinessRule),
        }
    }

    assert_eq!(committed, 7);

    let stock = bakery.get_material(&harina).unwrap().unwrap().quantity;
    assert_eq!(stock, Decimal::ZERO);

    let sales = bakery.list_sales().unwrap();
    assert_eq!(sales.len(), 7);
    let consumed: Decimal = sales
        .iter()
        .flat_map(|sale| sale.consumption.iter())
        .map(|entry| entry.quantity)
        .sum();
    assert_eq!(consumed, dec!(10.5));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn commits_and_restocks_interleave_consistently() {
    let (bakery, harina, pastel) = stocked_bakery(dec!(2));

    let seller = {
        let bakery = bakery.clone();
        tokio::task::spawn_blocking(move || {
            let mut committed = Vec::new();
            for _ in 0..50 {
                if let Ok(sale) = bakery.commit_sale(SaleInput {
                    product_id: pastel.clone(),
                    unit_price: Money::from_units(450),
                    quantity: 1,
                }) {
                    committed.push(sale);
                }
            }
            committed
        })
    };

    let restocker = {
        let bakery = bakery.clone();
        let harina = harina.clone();
        tokio::task::spawn_blocking(move || {
            for _ in 0..10 {
                let current = bakery.get_material(&harina).unwrap().unwrap().quantity;
                let patch = obrador_core::MaterialPatch {
                    quantity: Some(current + dec!(1)),
                    ..Default::default()
                };
                bakery.update_material(&harina, &patch).unwrap();
            }
        })
    };

    let committed = seller.await.unwrap();
    restocker.await.unwrap();

    let stock = bakery.get_material(&harina).unwrap().unwrap().quantity;
    assert!(stock >= Decimal::ZERO);
    assert_eq!(bakery.list_sales().unwrap().len(), committed.len());
    for sale in &committed {
        assert_eq!(sale.consumption[0].quantity, dec!(0.5));
    }
}
