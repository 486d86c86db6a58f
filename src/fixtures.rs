//! Shared test data: a tiny slice of the Olist dataset shaped like the real files.

use std::path::Path;

use serde_json::{Value, json};

use crate::database::{Dataset, Row, Table, loader::parse_table};

pub const ORDERS: &str = "\
order_id,customer_id,order_status,order_purchase_timestamp
o1,c1,delivered,2017-01-05 10:00:00
o2,c2,delivered,2017-01-05 15:30:00
o3,c3,delivered,2017-02-01 00:00:00
o4,c9,delivered,2017-02-02 09:00:00
";

pub const CUSTOMERS: &str = "\
customer_id,customer_unique_id,customer_zip_code_prefix,customer_city,customer_state
c1,u1,01000,sao paulo,SP
c2,u2,20000,rio de janeiro,RJ
c3,u3,01001,sao paulo,SP
";

pub const PAYMENTS: &str = "\
order_id,payment_sequential,payment_type,payment_installments,payment_value
o1,1,credit_card,1,10.5
o2,1,boleto,1,20.0
o3,1,credit_card,2,30.0
o4,1,voucher,1,5.0
";

// o3 has two items: last-match keeps the second one, fan-out keeps both.
pub const ORDER_ITEMS: &str = "\
order_id,order_item_id,product_id,seller_id,price
o1,1,p1,s1,9.90
o2,1,p2,s2,19.90
o3,1,p1,s1,29.90
o3,2,p2,s2,1.00
";

pub const PRODUCTS: &str = "\
product_id,product_category_name
p1,cama_mesa_banho
p2,esporte_lazer
";

pub const SELLERS: &str = "\
seller_id,seller_zip_code_prefix,seller_city,seller_state
s1,13000,campinas,SP
s2,30000,belo horizonte,MG
";

fn table(name: &str, csv: &str) -> Table {
    parse_table(name, csv.as_bytes()).unwrap()
}

pub fn dataset() -> Dataset {
    Dataset {
        orders: table("orders", ORDERS),
        order_items: table("order_items", ORDER_ITEMS),
        products: table("products", PRODUCTS),
        payments: table("payments", PAYMENTS),
        customers: table("customers", CUSTOMERS),
        sellers: None,
    }
}

pub fn dataset_with_sellers() -> Dataset {
    Dataset { sellers: Some(table("sellers", SELLERS)), ..dataset() }
}

/// Write the fixture tables under their default Olist file names.
pub fn write_dataset(dir: &Path) {
    for (file, content) in [
        ("olist_orders_dataset.csv", ORDERS),
        ("olist_customers_dataset.csv", CUSTOMERS),
        ("olist_order_payments_dataset.csv", PAYMENTS),
        ("olist_order_items_dataset.csv", ORDER_ITEMS),
        ("olist_products_dataset.csv", PRODUCTS),
        ("olist_sellers_dataset.csv", SELLERS),
    ] {
        std::fs::write(dir.join(file), content).unwrap();
    }
}

pub fn rows(values: Value) -> Vec<Row> {
    values.as_array().unwrap()
        .iter()
        .map(|v| Row(v.as_object().unwrap().clone()))
        .collect()
}

/// Already-denormalized records, as the charts see them.
pub fn records() -> Vec<Row> {
    rows(json!([
        { "order_id": "o1", "customer_id": "c1", "geolocation_city": "sao paulo", "customer_state": "SP", "seller_state": "SP",
          "product_category_name": "cama_mesa_banho", "payment_type": "credit_card", "payment_value": "10.5",
          "order_purchase_timestamp": "2017-01-05 00:00:00" },
        { "order_id": "o2", "customer_id": "c2", "geolocation_city": "rio de janeiro", "customer_state": "RJ", "seller_state": "MG",
          "product_category_name": "esporte_lazer", "payment_type": "boleto", "payment_value": "20",
          "order_purchase_timestamp": "2017-01-05 00:00:00" },
        { "order_id": "o3", "customer_id": "c3", "geolocation_city": "sao paulo", "customer_state": "SP", "seller_state": "MG",
          "product_category_name": "esporte_lazer", "payment_type": "credit_card", "payment_value": "30",
          "order_purchase_timestamp": "2017-02-01 00:00:00" },
        { "order_id": "o5", "customer_id": "c5", "geolocation_city": "curitiba", "customer_state": "PR", "seller_state": "SP",
          "product_category_name": "cama_mesa_banho", "payment_type": "voucher", "payment_value": "abc",
          "order_purchase_timestamp": "2017-03-10 00:00:00" }
    ]))
}
