use super::Product;

struct Demo {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    price: f64,
    tags: &'static [&'static str],
    category: &'static str,
    subcategory: &'static str,
    brand: &'static str,
    stock: u32,
    rating: f32,
    review_count: u32,
}

const DEMO: [Demo; 8] = [
    Demo {
        id: "demo-derz-premium",
        name: "Beyaz Derz Dolgusu - Premium",
        description: "Su geçirmez, esnek yapıda profesyonel derz dolgusu. Banyo ve mutfak uygulamaları için ideal.",
        price: 25.90,
        tags: &["derz_dolgusu", "beyaz_derz", "banyo_aksesuari", "su_gecirmez", "esnek_yapi"],
        category: "Yapı Malzemeleri",
        subcategory: "Derz Dolgular",
        brand: "BuildPro",
        stock: 150,
        rating: 4.5,
        review_count: 89,
    },
    Demo {
        id: "demo-derz-macunu",
        name: "Fayans Arası Derz Macunu",
        description: "Profesyonel kullanım için özel formülasyon. Antibakteriyel özellik ile hijyenik koruma.",
        price: 19.90,
        tags: &["fayans_dolgusu", "derz_macunu", "antibakteriyel", "hijyenik", "profesyonel"],
        category: "Yapı Malzemeleri",
        subcategory: "Derz Dolgular",
        brand: "TilePro",
        stock: 200,
        rating: 4.3,
        review_count: 156,
    },
    Demo {
        id: "demo-derz-silikon",
        name: "Silikon Derz Dolgusu Tüp",
        description: "Hassas uygulama için özel başlıklı tüp. Küf direnci olan formülasyon.",
        price: 15.50,
        tags: &["hassas_uygulama_derz", "plastik_tüp_derz", "silikon_derz", "küf_direnci"],
        category: "Yapı Malzemeleri",
        subcategory: "Derz Dolgular",
        brand: "SealMaster",
        stock: 75,
        rating: 4.7,
        review_count: 203,
    },
    Demo {
        id: "demo-derz-banyo",
        name: "Suya Dayanıklı Banyo Derzi",
        description: "Özel banyo formülasyonu. Uzun ömürlü ve renk değişimi yapmayan yapısı.",
        price: 32.00,
        tags: &["banyo_derz_dolgusu", "suya_dayanıklı_derz", "uzun_omurlu", "renk_sabiti"],
        category: "Yapı Malzemeleri",
        subcategory: "Derz Dolgular",
        brand: "AquaSeal",
        stock: 120,
        rating: 4.6,
        review_count: 178,
    },
    Demo {
        id: "demo-banyo-seti",
        name: "Modern Banyo Aksesuarı Seti",
        description: "Paslanmaz çelik banyo aksesuarı seti. Minimalist tasarım ve uzun ömürlü.",
        price: 89.90,
        tags: &["banyo_aksesuari", "paslanmaz_celik", "modern_tasarim", "minimalist"],
        category: "Banyo",
        subcategory: "Aksesuarlar",
        brand: "ModernHome",
        stock: 45,
        rating: 4.4,
        review_count: 92,
    },
    Demo {
        id: "demo-mutfak-temizleyici",
        name: "Profesyonel Mutfak Temizleyici",
        description: "Yağ çözücü özellik ile mutfak yüzeylerini etkili temizler. Doğal içerikli.",
        price: 12.75,
        tags: &["mutfak_gereci", "temizlik_urun", "yag_cozucu", "dogal_icerikli"],
        category: "Temizlik",
        subcategory: "Mutfak Temizlik",
        brand: "CleanMax",
        stock: 300,
        rating: 4.2,
        review_count: 445,
    },
    Demo {
        id: "demo-duvar-sticker",
        name: "Ev Dekorasyon Duvar Sticker",
        description: "Çıkarılabilir duvar süsleme sticker'ı. Çocuk odaları için güvenli.",
        price: 24.90,
        tags: &["ev_dekorasyonu", "duvar_susleme", "cikarilabilir", "cocuk_guvenli"],
        category: "Dekorasyon",
        subcategory: "Duvar Süslemeleri",
        brand: "DecoArt",
        stock: 80,
        rating: 4.1,
        review_count: 67,
    },
    Demo {
        id: "demo-yapistirici",
        name: "Yapıştırıcı Güçlendirici",
        description: "Çok amaçlı yapıştırıcı. Metal, plastik ve ahşap için uygun.",
        price: 18.60,
        tags: &["yapi_malzeme", "cok_amacli", "metal_uyumlu", "plastik_uyumlu", "ahsap_uyumlu"],
        category: "Yapı Malzemeleri",
        subcategory: "Yapıştırıcılar",
        brand: "FixAll",
        stock: 95,
        rating: 4.8,
        review_count: 234,
    },
];

/// The catalog a fresh installation starts with.
pub fn demo_products() -> Vec<Product> {
    DEMO.iter()
        .map(|demo| Product {
            id: demo.id.to_string(),
            name: demo.name.to_string(),
            description: demo.description.to_string(),
            price: demo.price,
            currency: "TL".to_string(),
            image_url: Some(format!("https://example.com/{}.jpg", demo.id)),
            tags: demo.tags.iter().map(|t| t.to_string()).collect(),
            category: demo.category.to_string(),
            subcategory: Some(demo.subcategory.to_string()),
            brand: Some(demo.brand.to_string()),
            stock: demo.stock,
            rating: Some(demo.rating),
            review_count: Some(demo.review_count),
        })
        .collect()
}
