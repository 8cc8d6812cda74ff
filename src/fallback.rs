//! Network-free meal suggestions used whenever the completion endpoint
//! cannot produce a usable set. Every table is static and read-only; the
//! output depends only on the meal category and the diet class.

use crate::meal::{Ingredient, MealCategory, MealPlan, MealPlanSet, MealRequest, NutritionalInfo};

/// Coarse bucketing of free-text preferences used to pick a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DietClass {
    Vegan,
    Vegetarian,
    Unrestricted,
}

impl DietClass {
    pub fn classify(preferences: &str) -> Self {
        let preferences = preferences.to_lowercase();
        if preferences.contains("vegan") {
            DietClass::Vegan
        } else if preferences.contains("vegetarian") {
            DietClass::Vegetarian
        } else {
            DietClass::Unrestricted
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CatalogMeal {
    name: &'static str,
    description: &'static str,
    ingredients: &'static [(&'static str, &'static str, f64)],
    instructions: &'static [&'static str],
    total_cost: f64,
    calories: &'static str,
    /// protein, carbs, fat
    macros: (f64, f64, f64),
}

impl CatalogMeal {
    fn to_meal_plan(self) -> MealPlan {
        MealPlan {
            name: self.name.to_string(),
            description: self.description.to_string(),
            ingredients: self
                .ingredients
                .iter()
                .map(|(name, amount, cost)| Ingredient {
                    name: name.to_string(),
                    amount: amount.to_string(),
                    cost: *cost,
                })
                .collect(),
            instructions: self.instructions.iter().map(|step| step.to_string()).collect(),
            total_cost: self.total_cost,
            nutritional_info: NutritionalInfo {
                calories: self.calories.to_string(),
                protein: self.macros.0,
                carbs: self.macros.1,
                fat: self.macros.2,
            },
        }
    }
}

// Breakfast

const TOAST_AND_EGGS: CatalogMeal = CatalogMeal {
    name: "Simple Toast and Eggs",
    description: "A classic breakfast of toast with fried eggs that balances carbohydrates and \
        protein to start your day with steady energy. It is quick to prepare, uses cheap everyday \
        ingredients and keeps you full until lunch.",
    ingredients: &[
        ("Bread", "2 slices", 20.0),
        ("Eggs", "2 large", 30.0),
        ("Butter", "1 tablespoon", 10.0),
        ("Salt", "1 pinch", 1.0),
    ],
    instructions: &[
        "Toast the bread until golden brown",
        "Heat the butter in a pan over medium heat",
        "Crack the eggs into the pan and fry to your liking",
        "Season with salt",
        "Serve the eggs on top of the buttered toast",
    ],
    total_cost: 61.0,
    calories: "320 kcal",
    macros: (40.0, 35.0, 25.0),
};

const MILK_UJI: CatalogMeal = CatalogMeal {
    name: "Kenyan Uji (Porridge)",
    description: "Traditional Kenyan porridge made with millet flour and finished with a splash of \
        milk, a warming breakfast staple. It gives slow-release energy for the whole morning and \
        can be sweetened to taste with a little sugar.",
    ingredients: &[
        ("Millet flour", "1/2 cup", 20.0),
        ("Water", "2 cups", 0.0),
        ("Milk", "1/2 cup", 15.0),
        ("Sugar", "2 tablespoons", 10.0),
    ],
    instructions: &[
        "Mix the flour with 1 cup of cold water into a smooth paste",
        "Boil the remaining water in a pot",
        "Stir the paste into the boiling water a little at a time",
        "Simmer on low heat for 5-7 minutes, stirring to prevent lumps",
        "Add the milk and sugar and serve hot",
    ],
    total_cost: 45.0,
    calories: "220 kcal",
    macros: (15.0, 80.0, 5.0),
};

const FRUIT_AND_YOGURT_BOWL: CatalogMeal = CatalogMeal {
    name: "Fruit and Yogurt Bowl",
    description: "A refreshing breakfast bowl of plain yogurt topped with banana and seasonal \
        fruit. The yogurt brings probiotics and protein while the fruit adds vitamins and natural \
        sweetness, making it a light but satisfying way to begin the day.",
    ingredients: &[
        ("Plain yogurt", "1 cup", 40.0),
        ("Banana", "1 medium", 15.0),
        ("Seasonal fruits", "1/2 cup chopped", 20.0),
        ("Honey", "1 tablespoon", 10.0),
    ],
    instructions: &[
        "Pour the yogurt into a bowl",
        "Slice the banana over the yogurt",
        "Add the chopped seasonal fruits",
        "Drizzle with honey and serve immediately",
    ],
    total_cost: 85.0,
    calories: "280 kcal",
    macros: (20.0, 60.0, 10.0),
};

const SPANISH_OMELETTE: CatalogMeal = CatalogMeal {
    name: "Spanish Omelette with Toast",
    description: "Fluffy eggs cooked with onion and tomato and served with toasted bread. This \
        vegetarian breakfast is rich in protein, comes together in about ten minutes and uses \
        ingredients found in almost every Kenyan kitchen.",
    ingredients: &[
        ("Eggs", "2 large", 30.0),
        ("Onion", "1 small", 10.0),
        ("Tomato", "1 medium", 15.0),
        ("Bread", "2 slices", 20.0),
        ("Cooking oil", "1 tablespoon", 10.0),
    ],
    instructions: &[
        "Dice the onion and tomato",
        "Whisk the eggs with a pinch of salt",
        "Fry the onion in oil until soft, then add the tomato",
        "Pour in the eggs and cook until set, folding once",
        "Toast the bread and serve alongside the omelette",
    ],
    total_cost: 85.0,
    calories: "380 kcal",
    macros: (30.0, 40.0, 30.0),
};

const MILLET_UJI_WITH_GROUNDNUTS: CatalogMeal = CatalogMeal {
    name: "Millet Uji with Roasted Groundnuts",
    description: "A plant-based take on the classic Kenyan porridge, cooked with water and \
        brightened with a squeeze of lemon. Roasted groundnuts on the side add protein and healthy \
        fats so the bowl keeps you going through a busy morning.",
    ingredients: &[
        ("Millet flour", "1/2 cup", 20.0),
        ("Water", "3 cups", 0.0),
        ("Sugar", "1 tablespoon", 10.0),
        ("Lemon", "1/2", 5.0),
        ("Roasted groundnuts", "1/4 cup", 20.0),
    ],
    instructions: &[
        "Mix the flour with 1 cup of cold water into a smooth paste",
        "Bring the remaining water to a boil",
        "Stir in the paste and simmer for 7 minutes, stirring constantly",
        "Add sugar and a squeeze of lemon",
        "Serve hot with the groundnuts on the side",
    ],
    total_cost: 55.0,
    calories: "310 kcal",
    macros: (15.0, 70.0, 15.0),
};

const SWEET_POTATOES_WITH_GINGER_TEA: CatalogMeal = CatalogMeal {
    name: "Sweet Potatoes with Ginger Tea",
    description: "Boiled sweet potatoes served with a strong cup of black tea spiced with fresh \
        ginger (tangawizi). A popular and filling Kenyan breakfast that is naturally plant-based, \
        rich in fibre and vitamin A, and very kind to a tight budget.",
    ingredients: &[
        ("Sweet potatoes", "2 medium", 40.0),
        ("Tea leaves", "1 teaspoon", 5.0),
        ("Fresh ginger", "1 small piece", 5.0),
        ("Sugar", "1 tablespoon", 5.0),
    ],
    instructions: &[
        "Wash the sweet potatoes and boil them in their skins for 20-25 minutes",
        "Crush the ginger and boil it in 1 cup of water for 3 minutes",
        "Add the tea leaves, simmer for 1 minute and strain",
        "Sweeten the tea with sugar",
        "Peel the sweet potatoes and serve with the hot ginger tea",
    ],
    total_cost: 55.0,
    calories: "300 kcal",
    macros: (8.0, 85.0, 7.0),
};

const AVOCADO_TOAST: CatalogMeal = CatalogMeal {
    name: "Avocado Toast with Tomato",
    description: "Toasted bread topped with mashed avocado, sliced tomato and a squeeze of lemon. \
        The avocado supplies healthy fats that keep you satisfied, the tomato adds freshness, and \
        the whole plate is ready in five minutes with no cooking beyond the toaster.",
    ingredients: &[
        ("Bread", "2 slices", 20.0),
        ("Avocado", "1 small", 20.0),
        ("Tomato", "1 large", 15.0),
        ("Lemon", "1/2", 5.0),
        ("Salt", "1 pinch", 1.0),
    ],
    instructions: &[
        "Toast the bread",
        "Mash the avocado with lemon juice and salt",
        "Spread the avocado over the toast",
        "Top with sliced tomato and serve",
    ],
    total_cost: 61.0,
    calories: "330 kcal",
    macros: (10.0, 50.0, 40.0),
};

// Lunch

const UGALI_WITH_SUKUMA: CatalogMeal = CatalogMeal {
    name: "Ugali with Sukuma Wiki",
    description: "The everyday Kenyan pairing of firm maize meal ugali and sauteed kale. Sukuma \
        wiki is packed with vitamins and iron while ugali provides the carbohydrates needed for an \
        active afternoon, all for very little money.",
    ingredients: &[
        ("Maize flour", "2 cups", 30.0),
        ("Sukuma wiki (kale)", "1 bunch", 35.0),
        ("Onion", "1 medium", 15.0),
        ("Tomato", "1 large", 15.0),
        ("Cooking oil", "1 tablespoon", 10.0),
        ("Salt", "to taste", 1.0),
    ],
    instructions: &[
        "Boil 4 cups of water in a pot",
        "Add the maize flour gradually while stirring to avoid lumps",
        "Keep turning the ugali until firm and cooked through",
        "In a separate pan fry the onion in oil until translucent",
        "Add the chopped tomato and cook until soft",
        "Add the chopped sukuma wiki and cook until tender",
        "Season with salt and serve with the ugali",
    ],
    total_cost: 106.0,
    calories: "480 kcal",
    macros: (15.0, 75.0, 10.0),
};

const RICE_AND_BEAN_STEW: CatalogMeal = CatalogMeal {
    name: "Rice and Bean Stew",
    description: "Fluffy rice served with a thick tomato and bean stew. The beans provide plenty \
        of protein and fibre, the spices give the stew depth, and the combination makes a complete \
        lunch that keeps you full well into the evening.",
    ingredients: &[
        ("Rice", "1 cup", 35.0),
        ("Beans", "1/2 cup", 20.0),
        ("Onion", "1 medium", 15.0),
        ("Tomatoes", "2 medium", 30.0),
        ("Cooking oil", "1 tablespoon", 10.0),
        ("Salt", "to taste", 1.0),
        ("Spices", "to taste", 5.0),
    ],
    instructions: &[
        "Boil the beans until soft, or use pre-cooked beans",
        "Cook the rice in a separate pot until fluffy",
        "Fry the onion in oil until translucent",
        "Add the tomatoes and spices and cook until soft",
        "Stir in the beans and simmer for 10 minutes",
        "Serve the stew over the rice",
    ],
    total_cost: 116.0,
    calories: "450 kcal",
    macros: (20.0, 70.0, 10.0),
};

const VEGETABLE_CHAPATI_WRAP: CatalogMeal = CatalogMeal {
    name: "Vegetable Chapati Wrap",
    description: "Soft homemade chapati rolled around a crunchy filling of carrot, cabbage and \
        onion. The wrap is portable, easy to vary with whatever vegetables are in season, and \
        combines a tender flatbread with fresh crisp textures.",
    ingredients: &[
        ("Wheat flour", "1 cup", 25.0),
        ("Cooking oil", "2 tablespoons", 20.0),
        ("Carrots", "1 medium", 10.0),
        ("Cabbage", "1/4 head", 15.0),
        ("Onion", "1 small", 10.0),
        ("Salt", "to taste", 1.0),
    ],
    instructions: &[
        "Mix the flour, salt and water into a soft dough",
        "Divide into balls and roll each into a flat circle",
        "Cook the chapatis on a hot pan until golden spots appear",
        "Grate the carrots and shred the cabbage finely",
        "Slice the onion thinly and toss with the vegetables",
        "Fill each chapati with vegetables, roll up and serve",
    ],
    total_cost: 81.0,
    calories: "350 kcal",
    macros: (10.0, 55.0, 35.0),
};

const GITHERI: CatalogMeal = CatalogMeal {
    name: "Githeri",
    description: "A hearty Kikuyu stew of maize and beans simmered with onion and tomato. Githeri \
        is one of the most affordable complete meals in Kenya, rich in plant protein and fibre, \
        and it tastes even better when reheated the next day.",
    ingredients: &[
        ("Dried maize", "1 cup", 30.0),
        ("Beans", "1 cup", 40.0),
        ("Onion", "1 medium", 15.0),
        ("Tomato", "1 large", 15.0),
        ("Cooking oil", "1 tablespoon", 10.0),
        ("Salt", "to taste", 1.0),
    ],
    instructions: &[
        "Soak the maize and beans overnight",
        "Boil them together until soft, about 1 hour",
        "Fry the onion in oil until golden",
        "Add the tomato and cook into a thick sauce",
        "Stir in the maize and beans, season with salt and simmer for 10 minutes",
    ],
    total_cost: 111.0,
    calories: "520 kcal",
    macros: (18.0, 65.0, 17.0),
};

const EGG_CHAPATI_WRAP: CatalogMeal = CatalogMeal {
    name: "Egg and Vegetable Chapati Roll",
    description: "A chapati rolled around scrambled egg, shredded cabbage and carrot, similar to \
        the popular rolex sold at roadside stalls. It is filling, quick to make at home and \
        balances carbohydrates, protein and fresh vegetables in one roll.",
    ingredients: &[
        ("Wheat flour", "1 cup", 25.0),
        ("Eggs", "1 large", 15.0),
        ("Cabbage", "1/4 head", 15.0),
        ("Carrots", "1 medium", 10.0),
        ("Cooking oil", "2 tablespoons", 20.0),
        ("Salt", "to taste", 1.0),
    ],
    instructions: &[
        "Make a soft chapati dough from flour, salt and water",
        "Roll out and cook the chapati on a hot pan",
        "Shred the cabbage and grate the carrot",
        "Scramble the egg with the vegetables in a little oil",
        "Spoon the filling onto the chapati, roll tightly and serve",
    ],
    total_cost: 86.0,
    calories: "420 kcal",
    macros: (20.0, 50.0, 30.0),
};

const NDENGU_WITH_RICE: CatalogMeal = CatalogMeal {
    name: "Ndengu Stew with Rice",
    description: "Green grams (ndengu) slow-cooked in a gently spiced tomato sauce and served over \
        white rice. Ndengu are cheap, high in protein and iron, and make a comforting lunch that \
        reheats well for the next day.",
    ingredients: &[
        ("Rice", "1 cup", 35.0),
        ("Green grams (ndengu)", "1/2 cup", 30.0),
        ("Onion", "1 medium", 15.0),
        ("Tomato", "1 large", 15.0),
        ("Cooking oil", "1 tablespoon", 10.0),
        ("Salt", "to taste", 1.0),
    ],
    instructions: &[
        "Boil the green grams until soft, about 40 minutes",
        "Cook the rice in a separate pot",
        "Fry the onion in oil, then add the tomato and cook down",
        "Add the green grams with some of their water and simmer until thick",
        "Season with salt and serve over the rice",
    ],
    total_cost: 106.0,
    calories: "480 kcal",
    macros: (20.0, 68.0, 12.0),
};

// Supper

const FRIED_TILAPIA_WITH_UGALI: CatalogMeal = CatalogMeal {
    name: "Fried Tilapia with Ugali",
    description: "A lakeside favourite of crispy fried tilapia served with ugali and sauteed \
        sukuma wiki. The fish gives lean protein and omega-3 fats while the ugali and greens round \
        it out into a satisfying and traditional Kenyan supper.",
    ingredients: &[
        ("Tilapia", "1 medium", 150.0),
        ("Maize flour", "2 cups", 30.0),
        ("Sukuma wiki (kale)", "1 bunch", 35.0),
        ("Onion", "1 medium", 15.0),
        ("Tomato", "1 large", 15.0),
        ("Cooking oil", "2 tablespoons", 20.0),
        ("Salt", "to taste", 1.0),
    ],
    instructions: &[
        "Clean the tilapia, score both sides and rub with salt",
        "Fry in hot oil until crisp and cooked through",
        "Cook the ugali by stirring maize flour into boiling water until firm",
        "Fry the onion and tomato, then add the sukuma wiki and cook until tender",
        "Serve the fish with ugali and greens",
    ],
    total_cost: 266.0,
    calories: "620 kcal",
    macros: (35.0, 45.0, 20.0),
};

const SPAGHETTI_WITH_VEGETABLE_SAUCE: CatalogMeal = CatalogMeal {
    name: "Spaghetti with Vegetable Sauce",
    description: "A comforting pasta supper coated in a rich sauce of tomatoes, onion and grated \
        carrot. The sauce is simple, economical and full of vegetables, and the whole dish is \
        ready in under half an hour on a single burner.",
    ingredients: &[
        ("Spaghetti", "250g", 40.0),
        ("Tomatoes", "3 large", 45.0),
        ("Onion", "1 large", 15.0),
        ("Carrots", "1 medium", 10.0),
        ("Cooking oil", "2 tablespoons", 20.0),
        ("Salt", "to taste", 1.0),
    ],
    instructions: &[
        "Boil the spaghetti in salted water until al dente",
        "Chop the tomatoes and onion and grate the carrot",
        "Fry the onion in oil until translucent",
        "Add the tomatoes and carrot and cook until soft",
        "Season the sauce with salt",
        "Drain the pasta, toss with the sauce and serve hot",
    ],
    total_cost: 131.0,
    calories: "450 kcal",
    macros: (12.0, 75.0, 13.0),
};

const CHAPATI_AND_BEEF_STEW: CatalogMeal = CatalogMeal {
    name: "Chapati and Beef Stew",
    description: "Soft chapati served with a rich beef stew of potatoes, carrots and tomatoes. \
        Tender beef simmered slowly in its own broth makes this classic Kenyan pairing a generous \
        supper for days when the budget allows a little more.",
    ingredients: &[
        ("Wheat flour", "2 cups", 50.0),
        ("Beef", "250g", 150.0),
        ("Potatoes", "2 medium", 30.0),
        ("Carrots", "1 medium", 10.0),
        ("Onion", "1 large", 15.0),
        ("Tomatoes", "2 medium", 30.0),
        ("Cooking oil", "3 tablespoons", 30.0),
        ("Salt", "to taste", 1.0),
    ],
    instructions: &[
        "Make the chapati dough from flour, salt and water and let it rest",
        "Cut the beef into small pieces and boil until tender",
        "Fry the onion in oil until golden, then add the tomatoes",
        "Add the carrots, potatoes and beef with some of the broth",
        "Simmer until the vegetables are tender and the sauce thickens",
        "Roll out and cook the chapatis on a hot pan",
        "Serve the chapatis with the stew",
    ],
    total_cost: 316.0,
    calories: "680 kcal",
    macros: (35.0, 50.0, 15.0),
};

const UGALI_SUKUMA_AND_MALA: CatalogMeal = CatalogMeal {
    name: "Ugali, Sukuma Wiki and Mala",
    description: "Ugali and sauteed kale served with a cold glass of mala, the tangy fermented \
        milk loved across Kenya. The mala adds protein and calcium to a vegetarian supper that is \
        light on the pocket and quick to put together.",
    ingredients: &[
        ("Maize flour", "2 cups", 30.0),
        ("Sukuma wiki (kale)", "1 bunch", 35.0),
        ("Onion", "1 medium", 15.0),
        ("Cooking oil", "1 tablespoon", 10.0),
        ("Mala (fermented milk)", "1 cup", 40.0),
        ("Salt", "to taste", 1.0),
    ],
    instructions: &[
        "Cook the ugali by stirring maize flour into boiling water until firm",
        "Fry the onion in oil until soft",
        "Add the chopped sukuma wiki and cook until tender",
        "Season with salt",
        "Serve the ugali and greens with a glass of chilled mala",
    ],
    total_cost: 131.0,
    calories: "560 kcal",
    macros: (20.0, 60.0, 20.0),
};

const CHAPATI_AND_BEAN_STEW: CatalogMeal = CatalogMeal {
    name: "Chapati and Bean Stew",
    description: "Layered homemade chapatis served with a thick stew of beans in tomato and onion \
        sauce. A filling plant-based supper where the beans supply protein and fibre and the \
        chapatis soak up every bit of the sauce.",
    ingredients: &[
        ("Wheat flour", "2 cups", 50.0),
        ("Beans", "1 cup", 40.0),
        ("Onion", "1 medium", 15.0),
        ("Tomatoes", "2 medium", 30.0),
        ("Cooking oil", "3 tablespoons", 30.0),
        ("Salt", "to taste", 1.0),
    ],
    instructions: &[
        "Boil the beans until soft",
        "Make a soft dough from flour, salt, water and a spoon of oil and let it rest",
        "Fry the onion in oil, add the tomatoes and cook into a sauce",
        "Add the beans and simmer for 15 minutes",
        "Roll out and cook the chapatis on a hot pan",
        "Serve the chapatis with the bean stew",
    ],
    total_cost: 166.0,
    calories: "650 kcal",
    macros: (18.0, 60.0, 22.0),
};

const EGG_FRIED_RICE: CatalogMeal = CatalogMeal {
    name: "Egg Fried Rice",
    description: "Rice stir-fried with scrambled egg, carrot, green pepper and spring onion. It is \
        a great way to use leftover rice, cooks in one pan in about fifteen minutes, and gives a \
        colourful vegetarian supper with a good share of protein.",
    ingredients: &[
        ("Rice", "1 cup", 35.0),
        ("Eggs", "2 large", 30.0),
        ("Carrots", "1 medium", 10.0),
        ("Green pepper", "1 small", 15.0),
        ("Spring onions", "2 stalks", 10.0),
        ("Cooking oil", "2 tablespoons", 20.0),
        ("Salt", "to taste", 1.0),
    ],
    instructions: &[
        "Cook the rice and let it cool, or use leftover rice",
        "Scramble the eggs in a little oil and set aside",
        "Stir-fry the diced carrot and green pepper for 3 minutes",
        "Add the rice and fry until heated through",
        "Fold in the eggs and spring onions, season with salt and serve",
    ],
    total_cost: 121.0,
    calories: "520 kcal",
    macros: (22.0, 60.0, 18.0),
};

const VEGETABLE_PILAU: CatalogMeal = CatalogMeal {
    name: "Vegetable Pilau",
    description: "Fragrant coastal-style pilau rice cooked with potatoes, garlic and pilau masala. \
        The warm spices give plenty of flavour without any animal products, and the potatoes make \
        it a filling one-pot supper for the whole household.",
    ingredients: &[
        ("Rice", "1 1/2 cups", 50.0),
        ("Potatoes", "2 medium", 30.0),
        ("Pilau masala", "1 teaspoon", 10.0),
        ("Onion", "1 large", 15.0),
        ("Garlic", "3 cloves", 10.0),
        ("Tomato", "1 large", 15.0),
        ("Cooking oil", "2 tablespoons", 20.0),
        ("Salt", "to taste", 1.0),
    ],
    instructions: &[
        "Fry the onion in oil until deep golden",
        "Add the garlic and pilau masala and stir for 1 minute",
        "Add the diced potatoes and tomato and cook for 5 minutes",
        "Stir in the washed rice and 3 cups of water with salt",
        "Cover and simmer on low heat until the water is absorbed",
        "Fluff with a fork and serve",
    ],
    total_cost: 151.0,
    calories: "560 kcal",
    macros: (10.0, 72.0, 18.0),
};

const UNRESTRICTED_BREAKFAST: [CatalogMeal; 3] = [TOAST_AND_EGGS, MILK_UJI, FRUIT_AND_YOGURT_BOWL];
const UNRESTRICTED_LUNCH: [CatalogMeal; 3] =
    [UGALI_WITH_SUKUMA, RICE_AND_BEAN_STEW, VEGETABLE_CHAPATI_WRAP];
const UNRESTRICTED_SUPPER: [CatalogMeal; 3] =
    [FRIED_TILAPIA_WITH_UGALI, SPAGHETTI_WITH_VEGETABLE_SAUCE, CHAPATI_AND_BEEF_STEW];

const VEGETARIAN_BREAKFAST: [CatalogMeal; 3] = [SPANISH_OMELETTE, MILK_UJI, FRUIT_AND_YOGURT_BOWL];
const VEGETARIAN_LUNCH: [CatalogMeal; 3] = [GITHERI, EGG_CHAPATI_WRAP, NDENGU_WITH_RICE];
const VEGETARIAN_SUPPER: [CatalogMeal; 3] =
    [UGALI_SUKUMA_AND_MALA, CHAPATI_AND_BEAN_STEW, EGG_FRIED_RICE];

const VEGAN_BREAKFAST: [CatalogMeal; 3] =
    [MILLET_UJI_WITH_GROUNDNUTS, SWEET_POTATOES_WITH_GINGER_TEA, AVOCADO_TOAST];
const VEGAN_LUNCH: [CatalogMeal; 3] = [UGALI_WITH_SUKUMA, GITHERI, VEGETABLE_CHAPATI_WRAP];
const VEGAN_SUPPER: [CatalogMeal; 3] =
    [CHAPATI_AND_BEAN_STEW, SPAGHETTI_WITH_VEGETABLE_SAUCE, VEGETABLE_PILAU];

fn catalog(category: MealCategory, diet: DietClass) -> [CatalogMeal; 3] {
    match (diet, category) {
        (DietClass::Unrestricted, MealCategory::Breakfast) => UNRESTRICTED_BREAKFAST,
        (DietClass::Unrestricted, MealCategory::Lunch) => UNRESTRICTED_LUNCH,
        (DietClass::Unrestricted, MealCategory::Supper) => UNRESTRICTED_SUPPER,
        (DietClass::Vegetarian, MealCategory::Breakfast) => VEGETARIAN_BREAKFAST,
        (DietClass::Vegetarian, MealCategory::Lunch) => VEGETARIAN_LUNCH,
        (DietClass::Vegetarian, MealCategory::Supper) => VEGETARIAN_SUPPER,
        (DietClass::Vegan, MealCategory::Breakfast) => VEGAN_BREAKFAST,
        (DietClass::Vegan, MealCategory::Lunch) => VEGAN_LUNCH,
        (DietClass::Vegan, MealCategory::Supper) => VEGAN_SUPPER,
    }
}

/// The fixed three-meal set for a category and diet class. Never fails.
pub fn fallback_meal_plans(category: MealCategory, diet: DietClass) -> MealPlanSet {
    MealPlanSet::new(catalog(category, diet).map(CatalogMeal::to_meal_plan))
}

pub fn fallback_for_request(request: &MealRequest) -> MealPlanSet {
    fallback_meal_plans(request.category, DietClass::classify(&request.preferences))
}
