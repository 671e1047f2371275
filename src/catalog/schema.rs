use sea_query::Iden;

pub(crate) enum Categories {
    Table,
    Id,
    Name,
}

impl Iden for Categories {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Table => "categories",
                Self::Id => "id",
                Self::Name => "name",
            }
        )
        .unwrap();
    }
}

pub(crate) enum ProductTypes {
    Table,
    Id,
    Name,
}

impl Iden for ProductTypes {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Table => "product_types",
                Self::Id => "id",
                Self::Name => "name",
            }
        )
        .unwrap();
    }
}

pub(crate) enum Sizes {
    Table,
    Id,
    ProductTypeId,
    Name,
}

impl Iden for Sizes {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Table => "sizes",
                Self::Id => "id",
                Self::ProductTypeId => "product_type_id",
                Self::Name => "name",
            }
        )
        .unwrap();
    }
}

pub(crate) enum Colors {
    Table,
    Id,
    Name,
    _HexCode,
}

impl Iden for Colors {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Table => "colors",
                Self::Id => "id",
                Self::Name => "name",
                Self::_HexCode => "hex_code",
            }
        )
        .unwrap();
    }
}

pub(crate) enum ProductGroups {
    Table,
    Id,
    Slug,
}

impl Iden for ProductGroups {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Table => "product_groups",
                Self::Id => "id",
                Self::Slug => "slug",
            }
        )
        .unwrap();
    }
}

pub(crate) enum Products {
    Table,
    Id,
    Name,
    Description,
    Price,
    Stock,
    ImageUrl,
    CategoryId,
    ProductTypeId,
    SizeId,
    ColorId,
    ProductGroupId,
    _CreatedAt,
}

impl Iden for Products {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Table => "products",
                Self::Id => "id",
                Self::Name => "name",
                Self::Description => "description",
                Self::Price => "price",
                Self::Stock => "stock",
                Self::ImageUrl => "image_url",
                Self::CategoryId => "category_id",
                Self::ProductTypeId => "product_type_id",
                Self::SizeId => "size_id",
                Self::ColorId => "color_id",
                Self::ProductGroupId => "product_group_id",
                Self::_CreatedAt => "created_at",
            }
        )
        .unwrap();
    }
}
