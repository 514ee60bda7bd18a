/// One table of the Olist dataset and the CSV file it is loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub table: &'static str,
    pub columns: &'static [&'static str],
    pub csv_file: &'static str,
}

impl TableSpec {
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// The four Olist tables, in load order (parents before children).
pub const OLIST_TABLES: &[TableSpec] = &[
    TableSpec {
        table: "customers",
        columns: &[
            "customer_id",
            "customer_unique_id",
            "customer_zip_code_prefix",
            "customer_city",
            "customer_state",
        ],
        csv_file: "olist_customers_dataset.csv",
    },
    TableSpec {
        table: "orders",
        columns: &[
            "order_id",
            "customer_id",
            "order_status",
            "order_purchase_timestamp",
            "order_approved_at",
            "order_delivered_carrier_date",
            "order_delivered_customer_date",
            "order_estimated_delivery_date",
        ],
        csv_file: "olist_orders_dataset.csv",
    },
    TableSpec {
        table: "order_payments",
        columns: &[
            "order_id",
            "payment_sequential",
            "payment_type",
            "payment_installments",
            "payment_value",
        ],
        csv_file: "olist_order_payments_dataset.csv",
    },
    TableSpec {
        table: "order_reviews",
        columns: &[
            "review_id",
            "order_id",
            "review_score",
            "review_comment_title",
            "review_comment_message",
            "review_creation_date",
            "review_answer_timestamp",
        ],
        csv_file: "olist_order_reviews_dataset.csv",
    },
];
