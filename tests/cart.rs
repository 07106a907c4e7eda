use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use storefront_api::{
    catalog::{self, Product, ProductId},
    storefront::cart::{Cart, CartError},
};

fn product(id: u32) -> &'static Product {
    catalog::find_product(ProductId(id)).expect("catalog product")
}

fn assert_totals_consistent(cart: &Cart) {
    let count: u64 = cart.lines().iter().map(|l| u64::from(l.quantity)).sum();
    let price: Decimal = cart
        .lines()
        .iter()
        .map(|l| l.product.price * Decimal::from(l.quantity))
        .sum();
    assert_eq!(cart.total_item_count(), count);
    assert_eq!(cart.total_price(), price);
}

#[test]
fn empty_cart_has_zero_totals() {
    let cart = Cart::new();
    assert!(cart.is_empty());
    assert_eq!(cart.total_item_count(), 0);
    assert_eq!(cart.total_price(), Decimal::ZERO);
}

#[test]
fn adding_same_product_increments_single_line() {
    let mut cart = Cart::new();
    cart.add_item(product(1), 1).unwrap();
    cart.add_item(product(1), 2).unwrap();

    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.quantity_of(ProductId(1)), Some(3));
    assert_eq!(cart.total_price(), dec!(720.00));
}

#[test]
fn add_rejects_zero_quantity_without_mutating() {
    let mut cart = Cart::new();
    cart.add_item(product(2), 1).unwrap();

    assert_eq!(cart.add_item(product(3), 0), Err(CartError::InvalidQuantity));
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.quantity_of(ProductId(3)), None);
}

#[test]
fn lines_keep_insertion_order() {
    let mut cart = Cart::new();
    cart.add_item(product(3), 1).unwrap();
    cart.add_item(product(1), 1).unwrap();
    cart.add_item(product(3), 1).unwrap();

    let ids: Vec<ProductId> = cart.lines().iter().map(|l| l.product.id).collect();
    assert_eq!(ids, vec![ProductId(3), ProductId(1)]);
}

#[test]
fn update_quantity_to_zero_removes_line() {
    let mut cart = Cart::new();
    cart.add_item(product(1), 2).unwrap();
    cart.add_item(product(2), 1).unwrap();

    cart.update_quantity(ProductId(1), 0).unwrap();

    assert_eq!(cart.quantity_of(ProductId(1)), None);
    assert_eq!(cart.total_item_count(), 1);
    assert_eq!(cart.total_price(), dec!(150.00));
}

#[test]
fn update_quantity_negative_removes_and_absent_is_noop() {
    let mut cart = Cart::new();
    cart.add_item(product(4), 2).unwrap();

    cart.update_quantity(ProductId(999), 5).unwrap();
    assert_eq!(cart.total_item_count(), 2);

    cart.update_quantity(ProductId(4), -1).unwrap();
    assert!(cart.is_empty());
}

#[test]
fn update_quantity_sets_value() {
    let mut cart = Cart::new();
    cart.add_item(product(5), 1).unwrap();
    cart.update_quantity(ProductId(5), 4).unwrap();

    assert_eq!(cart.quantity_of(ProductId(5)), Some(4));
    assert_eq!(cart.total_price(), dec!(1000.00));
}

#[test]
fn update_quantity_rejects_values_that_do_not_fit() {
    let mut cart = Cart::new();
    cart.add_item(product(5), 2).unwrap();

    let too_many = i64::from(u32::MAX) + 1;
    assert_eq!(
        cart.update_quantity(ProductId(5), too_many),
        Err(CartError::QuantityTooLarge(too_many))
    );
    assert_eq!(cart.quantity_of(ProductId(5)), Some(2));
    assert_eq!(cart.total_price(), dec!(500.00));
}

#[test]
fn add_rejects_line_overflow_without_mutating() {
    let mut cart = Cart::new();
    cart.add_item(product(1), u32::MAX).unwrap();

    assert_eq!(
        cart.add_item(product(1), 1),
        Err(CartError::QuantityTooLarge(i64::from(u32::MAX) + 1))
    );
    assert_eq!(cart.quantity_of(ProductId(1)), Some(u32::MAX));
}

#[test]
fn remove_and_clear() {
    let mut cart = Cart::new();
    cart.add_item(product(1), 1).unwrap();
    cart.add_item(product(6), 3).unwrap();

    cart.remove_item(ProductId(42));
    assert_eq!(cart.lines().len(), 2);

    cart.remove_item(ProductId(1));
    assert_eq!(cart.total_item_count(), 3);
    assert_eq!(cart.total_price(), dec!(600.00));

    cart.clear();
    assert!(cart.is_empty());
    assert_eq!(cart.total_price(), Decimal::ZERO);
}

#[test]
fn totals_track_mixed_operation_sequence() {
    let mut cart = Cart::new();
    let steps: Vec<Box<dyn Fn(&mut Cart)>> = vec![
        Box::new(|c| c.add_item(product(1), 2).unwrap()),
        Box::new(|c| c.add_item(product(2), 1).unwrap()),
        Box::new(|c| c.update_quantity(ProductId(2), 5).unwrap()),
        Box::new(|c| c.add_item(product(6), 1).unwrap()),
        Box::new(|c| c.remove_item(ProductId(1))),
        Box::new(|c| c.update_quantity(ProductId(6), 0).unwrap()),
        Box::new(|c| c.add_item(product(1), 1).unwrap()),
    ];

    for step in steps {
        step(&mut cart);
        assert_totals_consistent(&cart);
    }
    assert_eq!(cart.total_item_count(), 6);
    assert_eq!(cart.total_price(), dec!(990.00));
}

#[test]
fn order_lines_and_snapshot_follow_cart() {
    let mut cart = Cart::new();
    cart.add_item(product(1), 2).unwrap();

    let lines = cart.order_lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].id, ProductId(1));
    assert_eq!(lines[0].quantity, 2);

    let snapshot = cart.snapshot();
    assert_eq!(snapshot[0].name, "Fringe Buubu Dress");
    assert_eq!(snapshot[0].price, dec!(240.00));
}
