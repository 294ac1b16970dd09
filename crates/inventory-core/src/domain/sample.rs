//! 빈 테이블 초기화용 샘플 상품.

use rust_decimal_macros::dec;

use super::ProductDraft;

/// 개발 환경 시드 데이터.
///
/// `database.seed_sample_data`가 켜져 있고 테이블이 비어 있을 때만 삽입됩니다.
pub fn sample_products() -> Vec<ProductDraft> {
    let item = |name: &str, price, stock, description: &str, category: &str, image_url: &str| {
        ProductDraft {
            name: name.to_string(),
            price,
            stock,
            description: description.to_string(),
            category: category.to_string(),
            image_url: image_url.to_string(),
        }
    };

    vec![
        item(
            "iPhone 14 Pro",
            dec!(1299.99),
            50,
            "A16 Bionic 칩을 탑재한 최신 iPhone",
            "Electronics",
            "https://images.pexels.com/photos/788946/pexels-photo-788946.jpeg",
        ),
        item(
            "Samsung Galaxy S23",
            dec!(999.99),
            75,
            "200MP 카메라를 갖춘 안드로이드 스마트폰",
            "Electronics",
            "https://images.pexels.com/photos/1092644/pexels-photo-1092644.jpeg",
        ),
        item(
            "MacBook Pro 14",
            dec!(2499.99),
            30,
            "M2 Pro 칩을 탑재한 전문가용 노트북",
            "Electronics",
            "https://images.pexels.com/photos/18105/pexels-photo.jpg",
        ),
        item(
            "Casual Shirt",
            dec!(49.99),
            100,
            "일상용 면 100% 셔츠",
            "Clothing",
            "https://images.pexels.com/photos/996329/pexels-photo-996329.jpeg",
        ),
        item(
            "Premium Jeans",
            dec!(89.99),
            80,
            "모던 핏 프리미엄 데님",
            "Clothing",
            "https://images.pexels.com/photos/1082529/pexels-photo-1082529.jpeg",
        ),
    ]
}
