use super::*;

#[test]
fn test_to_decimal_precision() {
    // Classic floating point problem: 0.1 + 0.2 != 0.3
    let a = 0.1_f64;
    let b = 0.2_f64;
    let sum_f64 = a + b;

    // f64 fails
    assert_ne!(sum_f64, 0.3);

    // Decimal succeeds
    let sum_dec = to_decimal(a) + to_decimal(b);
    assert_eq!(to_f64(sum_dec), 0.3);
}

#[test]
fn test_normalize_mass_aliases() {
    for alias in ["kg", "KG", " Kgs ", "kilogram", "kilograms"] {
        let (qty, base) = normalize(1.5, alias);
        assert_eq!(qty, 1500.0, "alias {alias}");
        assert_eq!(base, BaseUnit::Gram, "alias {alias}");
    }
    for alias in ["gm", "g", "gms", "gram", "grams"] {
        let (qty, base) = normalize(100.0, alias);
        assert_eq!(qty, 100.0, "alias {alias}");
        assert_eq!(base, BaseUnit::Gram, "alias {alias}");
    }
}

#[test]
fn test_normalize_volume_aliases() {
    for alias in ["ltr", "l", "ltrs", "litre", "liter", "litres", "liters"] {
        let (qty, base) = normalize(8.0, alias);
        assert_eq!(qty, 8000.0, "alias {alias}");
        assert_eq!(base, BaseUnit::Milliliter, "alias {alias}");
    }
    let (qty, base) = normalize(250.0, "ml");
    assert_eq!(qty, 250.0);
    assert_eq!(base, BaseUnit::Milliliter);
}

#[test]
fn test_normalize_count_aliases() {
    for alias in ["pieces", "piece", "pcs", "pc", "nos", "no"] {
        let (qty, base) = normalize(50.0, alias);
        assert_eq!(qty, 50.0, "alias {alias}");
        assert_eq!(base, BaseUnit::Piece, "alias {alias}");
    }
}

#[test]
fn test_normalize_unknown_unit_passthrough() {
    // Unknown units never raise; they become their own family
    let (qty, base) = normalize(3.0, " Bunch ");
    assert_eq!(qty, 3.0);
    assert_eq!(base, BaseUnit::Other("bunch".to_string()));

    // Two different unknown units are different families
    let (_, other) = normalize(1.0, "sprig");
    assert_ne!(base, other);
}

#[test]
fn test_normalize_rounds_at_conversion_point() {
    // 0.7 kg must come out as exactly 700, not 700.0000000001
    let (qty, _) = normalize(0.7, "kg");
    assert_eq!(qty, 700.0);

    let (qty, _) = normalize(1.23456, "kg");
    assert_eq!(qty, 1234.56);
}

#[test]
fn test_denormalize_round_trip() {
    // normalize followed by denormalize returns the original within 0.01
    let cases = [
        (1.5, "kg"),
        (0.7, "kg"),
        (8.0, "ltr"),
        (0.04, "ltr"),
        (250.0, "ml"),
        (12.0, "pieces"),
        (2.5, "bunch"),
    ];
    for (qty, unit) in cases {
        let (base_qty, base_unit) = normalize(qty, unit);
        let back = denormalize(base_qty, &base_unit, unit);
        assert!(
            quantity_eq(back, qty),
            "{qty} {unit} -> {base_qty} {base_unit} -> {back}"
        );
    }
}

#[test]
fn test_denormalize_examples() {
    assert_eq!(denormalize(1500.0, &BaseUnit::Gram, "kg"), 1.5);
    assert_eq!(denormalize(700.0, &BaseUnit::Gram, "kg"), 0.7);
    assert_eq!(denormalize(8000.0, &BaseUnit::Milliliter, "ltr"), 8.0);
    // Same unit: magnitude unchanged
    assert_eq!(denormalize(700.0, &BaseUnit::Gram, "gm"), 700.0);
    // Cross-family target: no conversion
    assert_eq!(denormalize(700.0, &BaseUnit::Gram, "ltr"), 700.0);
}

#[test]
fn test_format_quantity_smart_display() {
    assert_eq!(format_quantity(0.7, "kg"), "700 gm");
    assert_eq!(format_quantity(1.5, "kg"), "1.5 kg");
    assert_eq!(format_quantity(0.04, "ltr"), "40 ml");
    assert_eq!(format_quantity(8.0, "ltr"), "8 ltr");
    assert_eq!(format_quantity(50.0, "pieces"), "50 pieces");
    assert_eq!(format_quantity(250.0, "gm"), "250 gm");
    assert_eq!(format_quantity(3.0, "bunch"), "3 bunch");
}

#[test]
fn test_format_quantity_boundary() {
    // Exactly one large unit stays in the large unit
    assert_eq!(format_quantity(1.0, "kg"), "1 kg");
    // Just below switches to the base unit, zero decimals
    assert_eq!(format_quantity(0.999, "kg"), "999 gm");
}

#[test]
fn test_parse_unit() {
    assert_eq!(parse_unit("KG"), BaseUnit::Gram);
    assert_eq!(parse_unit("liters"), BaseUnit::Milliliter);
    assert_eq!(parse_unit("pcs"), BaseUnit::Piece);
    assert_eq!(parse_unit("handful"), BaseUnit::Other("handful".to_string()));
}

#[test]
fn test_accumulation_precision() {
    // Deduct 0.01 gm one thousand times without drift
    let mut total = Decimal::ZERO;
    for _ in 0..1000 {
        total += to_decimal(0.01);
    }
    assert_eq!(to_f64(total), 10.0);
}

#[test]
fn test_quantity_eq_tolerance() {
    assert!(quantity_eq(100.0, 100.0));
    assert!(quantity_eq(100.004, 100.006));
    assert!(!quantity_eq(100.0, 100.02));
}
