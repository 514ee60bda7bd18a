//! The benchmark workload: schema DDL, the scalar and full-text query steps,
//! and the secondary indexes whose effect the harness measures.
//!
//! The review text is Brazilian Portuguese, so the full-text probes are too.

/// One named, independently runnable benchmark step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchStep {
    /// Stable slug for machine consumption
    pub name: &'static str,
    /// Human-readable label shown in reports
    pub label: &'static str,
    pub sql: &'static str,
}

/// Table DDL, in dependency order. The FULLTEXT key on `order_reviews` backs
/// the full-text suite; the scalar suite runs without secondary indexes until
/// the index pipeline adds them.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS customers (
        customer_id VARCHAR(32) NOT NULL,
        customer_unique_id VARCHAR(32) NOT NULL,
        customer_zip_code_prefix VARCHAR(10),
        customer_city VARCHAR(64),
        customer_state CHAR(2),
        PRIMARY KEY (customer_id)
    ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4",
    "CREATE TABLE IF NOT EXISTS orders (
        order_id VARCHAR(32) NOT NULL,
        customer_id VARCHAR(32) NOT NULL,
        order_status VARCHAR(16),
        order_purchase_timestamp DATETIME,
        order_approved_at DATETIME,
        order_delivered_carrier_date DATETIME,
        order_delivered_customer_date DATETIME,
        order_estimated_delivery_date DATETIME,
        PRIMARY KEY (order_id),
        FOREIGN KEY (customer_id) REFERENCES customers (customer_id)
    ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4",
    "CREATE TABLE IF NOT EXISTS order_payments (
        order_id VARCHAR(32) NOT NULL,
        payment_sequential INT NOT NULL,
        payment_type VARCHAR(16),
        payment_installments INT,
        payment_value DECIMAL(10,2),
        PRIMARY KEY (order_id, payment_sequential),
        FOREIGN KEY (order_id) REFERENCES orders (order_id)
    ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4",
    "CREATE TABLE IF NOT EXISTS order_reviews (
        review_id VARCHAR(32) NOT NULL,
        order_id VARCHAR(32) NOT NULL,
        review_score INT,
        review_comment_title VARCHAR(255),
        review_comment_message TEXT,
        review_creation_date DATETIME,
        review_answer_timestamp DATETIME,
        PRIMARY KEY (review_id, order_id),
        FOREIGN KEY (order_id) REFERENCES orders (order_id),
        FULLTEXT KEY ft_review_comments (review_comment_title, review_comment_message)
    ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4",
];

/// Scalar-predicate queries: amounts, dates, geography, and one join.
pub const SCALAR_STEPS: &[BenchStep] = &[
    BenchStep {
        name: "high-value-payments",
        label: "High-value payments (>$1000)",
        sql: "SELECT payment_type, payment_value FROM order_payments \
              WHERE payment_value > 1000 ORDER BY payment_value DESC LIMIT 10",
    },
    BenchStep {
        name: "payment-type-averages",
        label: "Average payment by type",
        sql: "SELECT payment_type, AVG(payment_value) as avg_payment, COUNT(*) as count \
              FROM order_payments GROUP BY payment_type ORDER BY avg_payment DESC",
    },
    BenchStep {
        name: "orders-by-year",
        label: "Orders by year",
        sql: "SELECT YEAR(order_purchase_timestamp) as year, COUNT(*) as order_count \
              FROM orders GROUP BY YEAR(order_purchase_timestamp) ORDER BY year",
    },
    BenchStep {
        name: "orders-2018",
        label: "Orders in 2018",
        sql: "SELECT COUNT(*) as order_count FROM orders \
              WHERE YEAR(order_purchase_timestamp) = 2018",
    },
    BenchStep {
        name: "customers-by-state",
        label: "Top 10 states by customer count",
        sql: "SELECT customer_state, COUNT(*) as customer_count FROM customers \
              GROUP BY customer_state ORDER BY customer_count DESC LIMIT 10",
    },
    BenchStep {
        name: "payment-by-state-join",
        label: "Average payment by state (JOIN query)",
        sql: "SELECT c.customer_state, AVG(p.payment_value) as avg_payment \
              FROM customers c \
              JOIN orders o ON c.customer_id = o.customer_id \
              JOIN order_payments p ON o.order_id = p.order_id \
              GROUP BY c.customer_state ORDER BY avg_payment DESC LIMIT 5",
    },
];

/// Full-text searches over review comments.
pub const FULLTEXT_STEPS: &[BenchStep] = &[
    BenchStep {
        name: "product-quality-search",
        label: "Search for 'produto qualidade' (product quality)",
        sql: "SELECT review_id, review_score, review_comment_message FROM order_reviews \
              WHERE MATCH(review_comment_title, review_comment_message) \
              AGAINST ('produto qualidade' IN NATURAL LANGUAGE MODE) LIMIT 5",
    },
    BenchStep {
        name: "boolean-search",
        label: "Boolean search: must contain 'bom' AND 'recomendo'",
        sql: "SELECT review_id, review_score, review_comment_message FROM order_reviews \
              WHERE MATCH(review_comment_title, review_comment_message) \
              AGAINST ('+bom +recomendo' IN BOOLEAN MODE) LIMIT 5",
    },
    BenchStep {
        name: "delivery-search",
        label: "Search for 'entrega rapido' (fast delivery)",
        sql: "SELECT review_id, review_score, review_comment_message FROM order_reviews \
              WHERE MATCH(review_comment_title, review_comment_message) \
              AGAINST ('entrega rapido' IN NATURAL LANGUAGE MODE) LIMIT 5",
    },
];

/// Secondary indexes matching the scalar predicates and the join key.
pub const INDEX_STATEMENTS: &[(&str, &str)] = &[
    (
        "idx_payment_value",
        "CREATE INDEX idx_payment_value ON order_payments(payment_value)",
    ),
    (
        "idx_payment_type",
        "CREATE INDEX idx_payment_type ON order_payments(payment_type)",
    ),
    (
        "idx_order_purchase_date",
        "CREATE INDEX idx_order_purchase_date ON orders(order_purchase_timestamp)",
    ),
    (
        "idx_customer_state",
        "CREATE INDEX idx_customer_state ON customers(customer_state)",
    ),
    (
        "idx_customer_id_orders",
        "CREATE INDEX idx_customer_id_orders ON orders(customer_id)",
    ),
];

/// The scalar steps re-timed after index creation, for the before/after
/// comparison.
pub const INDEX_COMPARISON_STEPS: &[BenchStep] = &[
    SCALAR_STEPS[0],
    SCALAR_STEPS[1],
    SCALAR_STEPS[2],
    SCALAR_STEPS[4],
    SCALAR_STEPS[5],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_names_are_unique() {
        let mut names: Vec<&str> = SCALAR_STEPS
            .iter()
            .chain(FULLTEXT_STEPS)
            .chain(INDEX_COMPARISON_STEPS)
            .map(|s| s.name)
            .collect();
        names.sort_unstable();
        names.dedup();
        // comparison steps are drawn from the scalar suite
        assert_eq!(names.len(), SCALAR_STEPS.len() + FULLTEXT_STEPS.len());
    }

    #[test]
    fn comparison_steps_are_a_subset_of_scalar() {
        for step in INDEX_COMPARISON_STEPS {
            assert!(SCALAR_STEPS.contains(step));
        }
    }

    #[test]
    fn fulltext_steps_use_match_against() {
        for step in FULLTEXT_STEPS {
            assert!(step.sql.contains("MATCH("));
            assert!(step.sql.contains("AGAINST"));
        }
    }

    #[test]
    fn every_indexed_column_appears_in_schema() {
        let schema = SCHEMA_STATEMENTS.join("\n");
        for (_, sql) in INDEX_STATEMENTS {
            let column = sql.rsplit('(').next().unwrap().trim_end_matches(')');
            assert!(schema.contains(column), "column {column} missing from schema");
        }
    }
}
