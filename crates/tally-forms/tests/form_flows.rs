//! Screen flows driven from a config file on disk.

use rust_decimal_macros::dec;
use tally_core::{CatalogEntry, Field, InputIssue, Money, Percent, RoundingMode};
use tally_forms::{
    AdjustmentKind, FormsConfig, FormsError, OrderForm, QuotationForm, SaleEntryForm,
    StockAdjustmentForm,
};

fn write_config(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("forms.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn quotation_uses_file_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"
        [defaults]
        order_discount_percent = "10"
        order_tax_percent = "8"
        "#,
    );
    let config = FormsConfig::load(Some(path)).unwrap();

    let mut form = QuotationForm::new("Q-100", &config);
    form.add_row("A", &CatalogEntry::new(Money::new(dec!(50)), Percent::ZERO));
    let b = form.add_row("B", &CatalogEntry::new(Money::new(dec!(30)), Percent::ZERO));
    form.set_quantity(b, "3").unwrap();

    let totals = form.snapshot().totals;
    assert_eq!(totals.sub_total, Money::new(dec!(140.00)));
    assert_eq!(totals.order_discount_amount, Money::new(dec!(14.00)));
    assert_eq!(totals.order_tax_amount, Money::new(dec!(10.08)));
    assert_eq!(totals.grand_total, Money::new(dec!(136.08)));
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = FormsConfig::load(Some(dir.path().join("absent.toml"))).unwrap();

    assert_eq!(config.pricing.decimal_places, 2);
    assert!(config.defaults.shipping_fee.is_zero());
}

#[test]
fn broken_file_is_reported_and_load_or_default_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[pricing\nrounding = ");

    assert!(matches!(
        FormsConfig::load(Some(path.clone())),
        Err(FormsError::ConfigParse(_))
    ));
    assert_eq!(FormsConfig::load_or_default(Some(path)), FormsConfig::default());
}

#[test]
fn invalid_policy_in_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[pricing]\nmax_quantity = 0\n");

    assert!(matches!(
        FormsConfig::load(Some(path)),
        Err(FormsError::Core(_))
    ));
}

#[test]
fn saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("forms.toml");

    let mut config = FormsConfig::default();
    config.pricing.rounding = RoundingMode::HalfEven;
    config.defaults.shipping_fee = Money::new(dec!(7.50));
    config.save(Some(path.clone())).unwrap();

    assert_eq!(FormsConfig::load(Some(path)).unwrap(), config);
}

#[test]
fn sale_modal_round() {
    let mut sale = SaleEntryForm::new(&FormsConfig::default());
    let tea = CatalogEntry::new(Money::new(dec!(2.00)), Percent::new(dec!(5)).unwrap());

    sale.add_product("tea", "Tea", &tea, 1);
    sale.add_product("tea", "Tea", &tea, 1);
    sale.set_field("tea", Field::DiscountPercent, "50").unwrap();
    sale.set_order_field(Field::ShippingFee, "3").unwrap();

    let snapshot = sale.snapshot();
    assert_eq!(snapshot.lines[0].quantity(), 2);
    assert_eq!(snapshot.lines[0].taxable_amount(), Money::new(dec!(2)));
    assert_eq!(snapshot.lines[0].line_total(), Money::new(dec!(2.10)));
    assert_eq!(snapshot.totals.grand_total, Money::new(dec!(7.00)));
    assert!(!snapshot.needs_attention());
}

#[test]
fn stock_adjustment_valuation() {
    let mut form = StockAdjustmentForm::new("Quarterly recount", &FormsConfig::default());
    let found = form.add_row("Cable", Money::new(dec!(4.20)), AdjustmentKind::Addition);
    let lost = form.add_row("Adapter", Money::new(dec!(9.99)), AdjustmentKind::Subtraction);
    form.set_quantity(found, "10").unwrap();
    form.set_quantity(lost, "-3").unwrap();

    let summary = form.summary();
    assert_eq!(summary.added.grand_total, Money::new(dec!(42.00)));
    assert_eq!(summary.removed.grand_total, Money::new(dec!(9.99)));
    assert_eq!(summary.net_value, Money::new(dec!(32.01)));
    assert!(!summary.has_warnings());

    assert!(summary.needs_attention());
    assert_eq!(summary.row_issues.len(), 1);
    assert_eq!(summary.row_issues[0].row_id, lost);
    assert!(matches!(
        summary.row_issues[0].issue,
        InputIssue::NegativeQuantityOrPrice {
            field: Field::Quantity
        }
    ));
}
